//! Reading circuits written in the five-gate subset of OpenQASM 2.0.
//!
//! Accepted programs have the form
//!
//! ```text
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[16];
//! creg c[16];
//! h q[0];
//! t q[3];
//! cx q[3],q[12];
//! ...
//! ```
//!
//! Header lines (`OPENQASM`, `include`, `qreg`, `creg`), blank lines, and `//`
//! comments are skipped. Every other line is read as a gate token followed by a
//! comma-separated list of `name[index]` operands. The gate token itself is not
//! checked here: an unknown gate is reported by
//! [`StateVector`][crate::StateVector] when it is applied.
//!
//! The register size is taken to be one more than the largest qubit index
//! referenced by any gate, not the size declared by `qreg`.

use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;
use tracing::debug;
use crate::{
    gate::Operation,
    state::{ SimError, StateVector },
};

#[derive(Debug, Error)]
pub enum QasmError {
    #[error("line {line}: malformed operand '{operand}'")]
    MalformedOperand { line: usize, operand: String },

    #[error("line {line}: gate '{gate}' has no operands")]
    MissingOperands { line: usize, gate: String },

    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}
pub type QasmResult<T> = Result<T, QasmError>;
use QasmError::*;

const HEADER_TOKENS: [&str; 4] = ["OPENQASM", "include", "qreg", "creg"];

/// A parsed program: the inferred register size and its operations in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    /// Number of qubits needed to run the operations.
    pub num_qubits: usize,
    /// Operations in order of appearance.
    pub ops: Vec<Operation>,
}

impl Circuit {
    /// Run `self` on a fresh register and return the engine.
    pub fn simulate(&self) -> QasmResult<StateVector> {
        let mut state = StateVector::new(self.num_qubits)?;
        state.run(&self.ops)?;
        Ok(state)
    }
}

// strip a trailing comment and surrounding whitespace
fn clean_line(line: &str) -> &str {
    line.split_once("//").map_or(line, |(code, _)| code).trim()
}

// parse `name[index]`, allowing whitespace around the brackets
fn parse_operand(line: usize, operand: &str) -> QasmResult<usize> {
    let malformed = || MalformedOperand { line, operand: operand.to_string() };
    let (name, rest) = operand.split_once('[').ok_or_else(malformed)?;
    let (idx, tail) = rest.split_once(']').ok_or_else(malformed)?;
    let name = name.trim();
    let valid_name =
        name.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic())
        && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid_name || !tail.trim().is_empty() { return Err(malformed()); }
    idx.trim().parse::<usize>().map_err(|_| malformed())
}

// parse a single non-header statement; `None` for lines to skip
fn parse_line(line: usize, text: &str) -> QasmResult<Option<Operation>> {
    let text = clean_line(text);
    let text = text.strip_suffix(';').unwrap_or(text).trim_end();
    let Some(gate) = text.split_whitespace().next() else { return Ok(None); };
    if HEADER_TOKENS.contains(&gate) { return Ok(None); }
    let args = text[gate.len()..].trim();
    if args.is_empty() {
        return Err(MissingOperands { line, gate: gate.to_string() });
    }
    let mut qubits: Vec<usize> =
        args.split(',')
        .map(|operand| parse_operand(line, operand))
        .collect::<QasmResult<_>>()?;
    // the last operand is the target; anything before it is a control
    let target = qubits.pop().into_iter().collect();
    Ok(Some(Operation::new(gate, target, qubits)))
}

/// Parse `src` into a list of operations in order of appearance.
pub fn parse(src: &str) -> QasmResult<Vec<Operation>> {
    let ops: Vec<Operation> =
        src.lines()
        .enumerate()
        .filter_map(|(k, text)| parse_line(k + 1, text).transpose())
        .collect::<QasmResult<_>>()?;
    debug!(ops = ops.len(), "parsed qasm");
    Ok(ops)
}

// register size needed by `ops`: at least one qubit; saturates so that an
// absurd index is rejected by the engine instead of wrapping
fn required_qubits(ops: &[Operation]) -> usize {
    ops.iter().flat_map(|op| op.qubits()).max().map_or(1, |q| q.saturating_add(1))
}

/// Return the number of qubits used by the operations in `src`: one more than
/// the largest qubit index referenced, or 1 if there are no operations.
pub fn num_qubits(src: &str) -> QasmResult<usize> {
    parse(src).map(|ops| required_qubits(&ops))
}

/// Parse `src` into a [`Circuit`].
pub fn parse_circuit(src: &str) -> QasmResult<Circuit> {
    let ops = parse(src)?;
    let num_qubits = required_qubits(&ops);
    Ok(Circuit { num_qubits, ops })
}

/// Parse and run `src`, returning the final state vector rounded to
/// [`DEFAULT_DECIMALS`][crate::state::DEFAULT_DECIMALS] places.
pub fn simulate(src: &str) -> QasmResult<nd::Array1<C64>> {
    parse_circuit(src)?.simulate().map(|state| state.state_vector())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c;

    const BELL: &str = "\
OPENQASM 2.0;
include \"qelib1.inc\";
qreg q[2];
creg c[2];
h q[0];
cx q[0],q[1];
";

    #[test]
    fn parse_header_and_gates() {
        let ops = parse(BELL).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::new("h", vec![0], vec![]),
                Operation::new("cx", vec![1], vec![0]),
            ],
        );
    }

    #[test]
    fn parse_multi_digit_and_spacing() {
        let src = "\
// leading comment
qreg q[16];

tdg q[12];
cx q[7], q[15]; // trailing comment
cx   q [ 10 ] ,q[3]
";
        let ops = parse(src).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::new("tdg", vec![12], vec![]),
                Operation::new("cx", vec![15], vec![7]),
                Operation::new("cx", vec![3], vec![10]),
            ],
        );
        assert_eq!(num_qubits(src).unwrap(), 16);
    }

    #[test]
    fn num_qubits_ignores_qreg() {
        let src = "qreg q[16];\nx q[2];\n";
        assert_eq!(num_qubits(src).unwrap(), 3);
        assert_eq!(num_qubits("OPENQASM 2.0;\nqreg q[4];\n").unwrap(), 1);
    }

    #[test]
    fn huge_index() {
        let src = format!("h q[{}];", usize::MAX);
        assert_eq!(num_qubits(&src).unwrap(), usize::MAX);
        assert_eq!(parse_circuit(&src).unwrap().num_qubits, usize::MAX);
        assert!(matches!(
            simulate(&src),
            Err(Sim(SimError::InvalidQubitCount(n))) if n == usize::MAX
        ));
        assert!(matches!(
            simulate(&format!("cx q[0],q[{}];", usize::MAX - 1)),
            Err(Sim(SimError::InvalidQubitCount(n))) if n == usize::MAX
        ));
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            parse("h q0;"),
            Err(MalformedOperand { line: 1, .. })
        ));
        assert!(matches!(
            parse("qreg q[2];\ncx q[0],q[x];"),
            Err(MalformedOperand { line: 2, .. })
        ));
        assert!(matches!(
            parse("h q[0]q;"),
            Err(MalformedOperand { line: 1, .. })
        ));
        assert!(matches!(
            parse("cx q[0],;"),
            Err(MalformedOperand { line: 1, .. })
        ));
        assert!(matches!(
            parse("\n\nh;"),
            Err(MissingOperands { line: 3, .. })
        ));
    }

    #[test]
    fn simulate_bell() {
        let sv = simulate(BELL).unwrap();
        let expected: nd::Array1<C64> =
            nd::array![c!(0.707), c!(0.0), c!(0.0), c!(0.707)];
        assert_eq!(sv, expected);
    }

    #[test]
    fn simulate_single_hadamard() {
        let sv = simulate("h q[0];").unwrap();
        let expected: nd::Array1<C64> = nd::array![c!(0.707), c!(0.707)];
        assert_eq!(sv, expected);
    }

    #[test]
    fn simulate_empty() {
        let sv = simulate("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n").unwrap();
        let expected: nd::Array1<C64> = nd::array![c!(1.0), c!(0.0)];
        assert_eq!(sv, expected);
    }

    #[test]
    fn simulate_errors() {
        assert!(matches!(
            simulate("h q[0];\nz q[1];"),
            Err(Sim(SimError::UnsupportedGate(_)))
        ));
        assert!(matches!(
            simulate("cx q[1],q[1];"),
            Err(Sim(SimError::InvalidOperand(_)))
        ));
        assert!(matches!(
            simulate("h q[0],q[1];"),
            Err(Sim(SimError::InvalidOperand(_)))
        ));
    }

    #[test]
    fn circuit_t_phase() {
        let circuit = parse_circuit("x q[1];\nt q[1];\nh q[0];").unwrap();
        assert_eq!(circuit.num_qubits, 2);
        let sv = circuit.simulate().unwrap().state_vector();
        // ∣01⟩ and ∣11⟩ share e^{iπ/4} / √2 = (1 + i) / 2
        let expected: nd::Array1<C64> =
            nd::array![c!(0.0), c!(0.5, 0.5), c!(0.0), c!(0.5, 0.5)];
        assert_eq!(sv, expected);
    }
}
