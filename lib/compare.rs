//! Element-wise comparison of amplitude vectors.
//!
//! Closeness follows the asymmetric rule used by NumPy's `isclose`: `a` is
//! close to a reference value `b` when
//!
//! ```text
//! |a - b| <= atol + rtol * |b|
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;

/// Relative and absolute tolerances for [`all_close`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance {
    /// Relative tolerance, scaled by the magnitude of the reference value.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self { Self { rtol: 1e-5, atol: 1e-8 } }
}

impl Tolerance {
    /// Return `true` if `a` is close to the reference value `b`.
    pub fn is_close(&self, a: C64, b: C64) -> bool {
        (a - b).norm() <= self.atol + self.rtol * b.norm()
    }
}

/// Return `true` if `a` and the reference `b` have the same length and every
/// pair of elements is close under `tol`.
pub fn all_close<'a, 'b, A, B>(a: A, b: B, tol: Tolerance) -> bool
where
    A: Into<nd::ArrayView1<'a, C64>>,
    B: Into<nd::ArrayView1<'b, C64>>,
{
    let a = a.into();
    let b = b.into();
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| tol.is_close(*x, *y))
}

/// Return the index of the first pair of elements that are not close under
/// `tol`, or `None` if there is no such pair.
///
/// Elements past the end of the shorter vector always count as mismatches.
pub fn first_mismatch<'a, 'b, A, B>(a: A, b: B, tol: Tolerance) -> Option<usize>
where
    A: Into<nd::ArrayView1<'a, C64>>,
    B: Into<nd::ArrayView1<'b, C64>>,
{
    let a = a.into();
    let b = b.into();
    a.iter().zip(b.iter())
        .position(|(x, y)| !tol.is_close(*x, *y))
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}
