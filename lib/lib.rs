//! This package contains a small, exact-convention state-vector simulator for
//! the five-gate subset of [OpenQASM 2.0][openqasm] made of `h`, `x`, `t`,
//! `tdg`, and `cx`.
//!
//! - [`gate`] describes the instruction set, both as validated [`gate::Gate`]s
//! and as the untyped [`gate::Operation`] records produced by a parser.
//! - [`state`] holds the [`StateVector`] engine, which evolves a register of
//! *n* qubits by applying gates with index-mask arithmetic over all 2^*n*
//! amplitudes.
//! - [`qasm`] reads circuit text into operations and drives the engine.
//! - [`compare`] tests two amplitude vectors for element-wise closeness.
//!
//! Amplitudes are ordered big-endian: qubit 0 is the most significant bit of
//! an amplitude's index, so that on two qubits the amplitude of ∣10⟩ (qubit 0
//! flipped) lives at index 2. This matches the convention used by
//! [Cirq][cirq-sv].
//!
//! ```
//! use svsim::{ c, gate::Gate, StateVector };
//!
//! let mut state = StateVector::new(2).unwrap();
//! state.apply(Gate::H(0)).unwrap();
//! state.apply(Gate::CX(0, 1)).unwrap();
//! let sv = state.state_vector();
//! assert_eq!(sv[0], c!(0.707));
//! assert_eq!(sv[3], c!(0.707));
//! ```
//!
//! [openqasm]: https://github.com/openqasm/openqasm/tree/OpenQASM2.x
//! [cirq-sv]: https://quantumai.google/reference/python/cirq/sim/StateVectorTrialResult#state_vector

pub mod gate;
pub mod state;
pub mod qasm;
pub mod compare;

pub use state::{ StateVector, SimError, SimResult };

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use svsim::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - i 1.0), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, 1.0),    Complex64::new(1.0, 1.0)       );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}
