//! Dense state-vector evolution of a register of qubits.
//!
//! A register of *n* qubits is described by 2^*n* complex amplitudes. The
//! amplitude at index *i* belongs to the basis state whose bit string is the
//! binary representation of *i*, read most-significant bit first: qubit 0 is
//! the most significant bit, qubit *n* – 1 the least. The bit belonging to
//! qubit *q* is therefore
//!
//! ```text
//! mask(q) = 1 << (n - q - 1)
//! ```
//!
//! and every supported gate is applied as a single pass over all indices,
//! reading the amplitudes at `i` and `i ^ mask(q)` from a frozen copy of the
//! current state and writing into a scratch buffer that then replaces it.

use std::{ f64::consts::FRAC_1_SQRT_2, fmt };
use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;
use tracing::{ debug, trace };
use crate::{
    c,
    gate::{ Gate, GateKind, Operation },
};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid qubit count {0}: must be between 1 and {max}", max = MAX_QUBITS)]
    InvalidQubitCount(usize),

    #[error("invalid qubit index {0}: register has {1} qubit(s)")]
    InvalidQubitIndex(usize, usize),

    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("unsupported gate '{0}'")]
    UnsupportedGate(String),
}
pub type SimResult<T> = Result<T, SimError>;
use SimError::*;

/// Largest register size accepted by [`StateVector::new`].
pub const MAX_QUBITS: usize = 30;

/// Number of decimal places kept by [`StateVector::state_vector`].
pub const DEFAULT_DECIMALS: i32 = 3;

// e^{iπ/4}
const T_PHASE: C64 = c!(FRAC_1_SQRT_2, FRAC_1_SQRT_2);

// e^{-iπ/4}
const TDG_PHASE: C64 = c!(FRAC_1_SQRT_2, -FRAC_1_SQRT_2);

/// Round both parts of `z` to `decimals` places, with ties going to the even
/// neighbor.
pub fn round_c64(z: C64, decimals: i32) -> C64 {
    let scale = 10.0_f64.powi(decimals);
    let round = |x: f64| (x * scale).round_ties_even() / scale;
    C64::new(round(z.re), round(z.im))
}

/// A pure state of `n` qubits, evolved in place by gate application.
///
/// Each gate is computed from a frozen read of the current amplitudes into a
/// second buffer of equal size, which is then swapped in, so no amplitude is
/// ever read after it has been overwritten within the same step.
#[derive(Clone, Debug)]
pub struct StateVector {
    n: usize,
    state: nd::Array1<C64>,
    scratch: nd::Array1<C64>,
    index: nd::Array1<usize>,
}

impl StateVector {
    /// Create a new register of `n` qubits initialized to ∣0...0⟩.
    ///
    /// Fails if `n` is zero or greater than [`MAX_QUBITS`].
    pub fn new(n: usize) -> SimResult<Self> {
        if n == 0 || n > MAX_QUBITS { return Err(InvalidQubitCount(n)); }
        let dim: usize = 1 << n;
        let mut state: nd::Array1<C64> = nd::Array1::zeros(dim);
        state[0] = c!(1.0);
        let scratch: nd::Array1<C64> = nd::Array1::zeros(dim);
        let index: nd::Array1<usize> = (0..dim).collect();
        debug!(qubits = n, dim, "allocated state vector");
        Ok(Self { n, state, scratch, index })
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the number of amplitudes, 2^`n`.
    pub fn dim(&self) -> usize { self.state.len() }

    /// Return a view of the current, unrounded amplitudes.
    pub fn amplitudes(&self) -> nd::ArrayView1<'_, C64> { self.state.view() }

    /// Return the total probability, Σ ∣ψ<sub>*i*</sub>∣².
    pub fn norm_sqr(&self) -> f64 {
        self.state.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Return a copy of the current amplitudes, each rounded to
    /// [`DEFAULT_DECIMALS`] places.
    pub fn state_vector(&self) -> nd::Array1<C64> {
        self.state_vector_rounded(DEFAULT_DECIMALS)
    }

    /// Return a copy of the current amplitudes, each rounded to `decimals`
    /// places.
    pub fn state_vector_rounded(&self, decimals: i32) -> nd::Array1<C64> {
        self.state.mapv(|a| round_c64(a, decimals))
    }

    // index bit belonging to qubit `q`
    fn mask(&self, q: usize) -> usize { 1 << (self.n - q - 1) }

    fn check_qubit(&self, q: usize) -> SimResult<()> {
        if q < self.n { Ok(()) } else { Err(InvalidQubitIndex(q, self.n)) }
    }

    /// Apply a [`Gate`].
    ///
    /// All operands are checked before anything is written, so a failed call
    /// leaves the state untouched.
    pub fn apply(&mut self, gate: Gate) -> SimResult<()> {
        self.check_qubit(gate.target())?;
        if let Some(c) = gate.control() {
            self.check_qubit(c)?;
            if c == gate.target() {
                return Err(InvalidOperand(
                    format!("cx control and target are both qubit {c}")));
            }
        }
        trace!(%gate, "apply");
        match gate {
            Gate::H(k) => self.apply_h(self.mask(k)),
            Gate::X(k) => self.apply_x(self.mask(k)),
            Gate::T(k) => self.apply_phase(self.mask(k), T_PHASE),
            Gate::Tdg(k) => self.apply_phase(self.mask(k), TDG_PHASE),
            Gate::CX(c, t) => self.apply_cx(self.mask(c), self.mask(t)),
        }
        std::mem::swap(&mut self.state, &mut self.scratch);
        Ok(())
    }

    /// Apply a gate given by its QASM token, target, and optional control.
    pub fn apply_named(
        &mut self,
        name: &str,
        target: usize,
        control: Option<usize>,
    ) -> SimResult<()>
    {
        let kind: GateKind = name.parse()?;
        self.apply(Gate::new(kind, target, control)?)
    }

    /// Apply a parsed [`Operation`].
    pub fn apply_op(&mut self, op: &Operation) -> SimResult<()> {
        self.apply(Gate::try_from(op)?)
    }

    /// Apply a sequence of operations in order, stopping at the first
    /// failure.
    ///
    /// Operations preceding a failing one remain applied.
    pub fn run<'a, I>(&mut self, ops: I) -> SimResult<()>
    where I: IntoIterator<Item = &'a Operation>
    {
        ops.into_iter().try_for_each(|op| self.apply_op(op))
    }

    fn apply_h(&mut self, mask: usize) {
        let old = self.state.view();
        nd::Zip::from(&mut self.scratch).and(&self.index).and(&old)
            .for_each(|new, &i, &a| {
                let sign = if i & mask == 0 { 1.0 } else { -1.0 };
                *new = (a * sign + old[i ^ mask]) * FRAC_1_SQRT_2;
            });
    }

    fn apply_x(&mut self, mask: usize) {
        let old = self.state.view();
        nd::Zip::from(&mut self.scratch).and(&self.index)
            .for_each(|new, &i| { *new = old[i ^ mask]; });
    }

    fn apply_phase(&mut self, mask: usize, phase: C64) {
        nd::Zip::from(&mut self.scratch).and(&self.index).and(&self.state)
            .for_each(|new, &i, &a| {
                *new = if i & mask == 0 { a } else { a * phase };
            });
    }

    fn apply_cx(&mut self, cmask: usize, tmask: usize) {
        let old = self.state.view();
        nd::Zip::from(&mut self.scratch).and(&self.index).and(&old)
            .for_each(|new, &i, &a| {
                *new = if i & cmask == 0 { a } else { old[i ^ tmask] };
            });
    }
}

impl fmt::Display for StateVector {
    /// Render every non-zero rounded term as `(re+imi)∣b_0...b_{n-1}⟩`,
    /// joined by `+`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n;
        let rounded = self.state_vector();
        let terms =
            rounded.iter()
            .enumerate()
            .filter(|(_, a)| **a != c!(0.0))
            .map(|(i, a)| format!("({a}) ∣{i:0n$b}⟩"))
            .join(" + ");
        if terms.is_empty() { f.write_str("0") } else { f.write_str(&terms) }
    }
}
