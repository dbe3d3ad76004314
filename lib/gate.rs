//! The five-gate instruction set.
//!
//! Gates exist in two forms: [`Operation`] is the loose record a circuit
//! parser emits (a gate token plus lists of target and control qubits), and
//! [`Gate`] is the validated, typed form consumed by
//! [`StateVector`][crate::StateVector]. Conversion between the two checks the
//! gate token and the operand shape, but not qubit bounds, which depend on the
//! register the gate is applied to.

use std::{ fmt, str::FromStr };
use crate::state::{ SimError, SimResult };

/// Identifies one of the supported gates without its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Hadamard.
    H,
    /// π-rotation about *x*.
    X,
    /// π/4-rotation about *z*.
    T,
    /// –π/4-rotation about *z*.
    Tdg,
    /// π-rotation about *x* on a target qubit, controlled by another.
    CX,
}

impl GateKind {
    /// All supported gates, in token order.
    pub const ALL: [Self; 5] = [Self::H, Self::X, Self::T, Self::Tdg, Self::CX];

    /// Return the QASM token for `self`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H => "h",
            Self::X => "x",
            Self::T => "t",
            Self::Tdg => "tdg",
            Self::CX => "cx",
        }
    }

    /// Return the number of control qubits taken by `self`.
    pub fn num_controls(&self) -> usize {
        match self {
            Self::CX => 1,
            _ => 0,
        }
    }

    /// Return `true` if `self` is a single-qubit gate.
    pub fn is_single(&self) -> bool { self.num_controls() == 0 }
}

impl FromStr for GateKind {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s {
            "h" => Ok(Self::H),
            "x" => Ok(Self::X),
            "t" => Ok(Self::T),
            "tdg" => Ok(Self::Tdg),
            "cx" => Ok(Self::CX),
            _ => Err(SimError::UnsupportedGate(s.to_string())),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unitary gate to apply to a register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard.
    H(usize),
    /// π-rotation about *x*.
    X(usize),
    /// π/4-rotation about *z*.
    T(usize),
    /// –π/4-rotation about *z*; the inverse of `T`.
    Tdg(usize),
    /// π-rotation about *x* on the second qubit, controlled by the first.
    CX(usize, usize),
}

impl Gate {
    /// Build a gate from its kind and operands.
    ///
    /// Fails with [`SimError::InvalidOperand`] if a control is missing for
    /// `CX`, if one is given to a single-qubit gate, or if a `CX` targets its
    /// own control.
    pub fn new(kind: GateKind, target: usize, control: Option<usize>)
        -> SimResult<Self>
    {
        match (kind, control) {
            (k, Some(c)) if k.is_single()
                => Err(SimError::InvalidOperand(
                    format!("{k} takes no control qubit, got {c}"))),
            (GateKind::H, _) => Ok(Self::H(target)),
            (GateKind::X, _) => Ok(Self::X(target)),
            (GateKind::T, _) => Ok(Self::T(target)),
            (GateKind::Tdg, _) => Ok(Self::Tdg(target)),
            (GateKind::CX, Some(c)) if c == target
                => Err(SimError::InvalidOperand(
                    format!("cx control and target are both qubit {c}"))),
            (GateKind::CX, Some(c)) => Ok(Self::CX(c, target)),
            (GateKind::CX, None)
                => Err(SimError::InvalidOperand(
                    "cx requires a control qubit".to_string())),
        }
    }

    /// Like [`Self::new`], but reading the gate from its QASM token.
    pub fn from_token(name: &str, target: usize, control: Option<usize>)
        -> SimResult<Self>
    {
        Self::new(name.parse()?, target, control)
    }

    /// Return the kind of `self`.
    pub fn kind(&self) -> GateKind {
        match self {
            Self::H(..) => GateKind::H,
            Self::X(..) => GateKind::X,
            Self::T(..) => GateKind::T,
            Self::Tdg(..) => GateKind::Tdg,
            Self::CX(..) => GateKind::CX,
        }
    }

    /// Return the target qubit.
    pub fn target(&self) -> usize {
        match *self {
            Self::H(k) | Self::X(k) | Self::T(k) | Self::Tdg(k) => k,
            Self::CX(_, t) => t,
        }
    }

    /// Return the control qubit, if any.
    pub fn control(&self) -> Option<usize> {
        match *self {
            Self::CX(c, _) => Some(c),
            _ => None,
        }
    }

    /// Return `true` if `self` is `H`.
    pub fn is_h(&self) -> bool { matches!(self, Self::H(..)) }

    /// Return `true` if `self` is `X`.
    pub fn is_x(&self) -> bool { matches!(self, Self::X(..)) }

    /// Return `true` if `self` is `T`.
    pub fn is_t(&self) -> bool { matches!(self, Self::T(..)) }

    /// Return `true` if `self` is `Tdg`.
    pub fn is_tdg(&self) -> bool { matches!(self, Self::Tdg(..)) }

    /// Return `true` if `self` is `CX`.
    pub fn is_cx(&self) -> bool { matches!(self, Self::CX(..)) }

    /// Return `true` if `other` is the inverse of `self`.
    pub fn is_inv(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::H(a), Self::H(b)) => a == b,
            (Self::X(a), Self::X(b)) => a == b,
            (Self::T(a), Self::Tdg(b)) => a == b,
            (Self::Tdg(a), Self::T(b)) => a == b,
            (Self::CX(c_a, t_a), Self::CX(c_b, t_b)) =>
                c_a == c_b && t_a == t_b,
            _ => false,
        }
    }

    /// Return the inverse of `self`.
    pub fn inv(&self) -> Self {
        match *self {
            Self::H(k) => Self::H(k),
            Self::X(k) => Self::X(k),
            Self::T(k) => Self::Tdg(k),
            Self::Tdg(k) => Self::T(k),
            Self::CX(c, t) => Self::CX(c, t),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CX(c, t) => write!(f, "cx q[{c}],q[{t}]"),
            g => write!(f, "{} q[{}]", g.kind(), g.target()),
        }
    }
}

/// A single circuit instruction as emitted by a parser.
///
/// Fields are kept in list form so that a parser needs no knowledge of the
/// instruction set; operand shape is checked when the record is converted to
/// a [`Gate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    /// Gate token, e.g. `"cx"`.
    pub gate: String,
    /// Target qubits.
    pub targets: Vec<usize>,
    /// Control qubits; empty for single-qubit gates.
    pub controls: Vec<usize>,
}

impl Operation {
    /// Create a new operation record.
    pub fn new<S>(gate: S, targets: Vec<usize>, controls: Vec<usize>) -> Self
    where S: Into<String>
    {
        Self { gate: gate.into(), targets, controls }
    }

    /// Iterate over every qubit index referenced by `self`.
    pub fn qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.controls.iter().chain(self.targets.iter()).copied()
    }
}

impl TryFrom<&Operation> for Gate {
    type Error = SimError;

    fn try_from(op: &Operation) -> SimResult<Self> {
        let kind: GateKind = op.gate.parse()?;
        let target =
            match op.targets.as_slice() {
                [t] => *t,
                ts => {
                    return Err(SimError::InvalidOperand(
                        format!("{kind} takes 1 target, got {}", ts.len())));
                },
            };
        let control =
            match op.controls.as_slice() {
                [] => None,
                [c] => Some(*c),
                cs => {
                    return Err(SimError::InvalidOperand(
                        format!(
                            "{kind} takes {} control(s), got {}",
                            kind.num_controls(),
                            cs.len(),
                        )));
                },
            };
        Self::new(kind, target, control)
    }
}

impl From<Gate> for Operation {
    fn from(gate: Gate) -> Self {
        Self::new(
            gate.kind().as_str(),
            vec![gate.target()],
            gate.control().into_iter().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind() {
        for kind in GateKind::ALL {
            assert_eq!(kind.as_str().parse::<GateKind>().unwrap(), kind);
        }
        assert!(matches!(
            "z".parse::<GateKind>(),
            Err(SimError::UnsupportedGate(s)) if s == "z"
        ));
        assert!("H".parse::<GateKind>().is_err());
        assert!("".parse::<GateKind>().is_err());
    }

    #[test]
    fn new_checks_operands() {
        assert_eq!(Gate::new(GateKind::H, 2, None).unwrap(), Gate::H(2));
        assert_eq!(Gate::new(GateKind::CX, 2, Some(0)).unwrap(), Gate::CX(0, 2));
        assert!(matches!(
            Gate::new(GateKind::CX, 1, Some(1)),
            Err(SimError::InvalidOperand(_))
        ));
        assert!(matches!(
            Gate::new(GateKind::CX, 1, None),
            Err(SimError::InvalidOperand(_))
        ));
        assert!(matches!(
            Gate::new(GateKind::T, 1, Some(0)),
            Err(SimError::InvalidOperand(_))
        ));
        assert!(matches!(
            Gate::from_token("z", 0, None),
            Err(SimError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn accessors() {
        let g = Gate::CX(3, 1);
        assert_eq!(g.kind(), GateKind::CX);
        assert_eq!(g.target(), 1);
        assert_eq!(g.control(), Some(3));
        assert!(g.is_cx());
        assert!(!g.is_h());
        assert_eq!(Gate::Tdg(4).target(), 4);
        assert_eq!(Gate::Tdg(4).control(), None);

        assert!(Gate::X(0).is_x());
        assert!(!Gate::X(0).is_t());
        assert!(Gate::T(0).is_t());
        assert!(!Gate::T(0).is_tdg());
        assert!(Gate::Tdg(0).is_tdg());
        assert!(!Gate::Tdg(0).is_x());
    }

    #[test]
    fn kind_arity() {
        for kind in GateKind::ALL {
            assert_eq!(kind.is_single(), kind != GateKind::CX);
            assert_eq!(kind.num_controls(), if kind.is_single() { 0 } else { 1 });
        }
    }

    #[test]
    fn inverses() {
        assert_eq!(Gate::T(0).inv(), Gate::Tdg(0));
        assert_eq!(Gate::Tdg(0).inv(), Gate::T(0));
        assert_eq!(Gate::H(1).inv(), Gate::H(1));
        assert!(Gate::T(2).is_inv(&Gate::Tdg(2)));
        assert!(!Gate::T(2).is_inv(&Gate::T(2)));
        assert!(!Gate::T(2).is_inv(&Gate::Tdg(1)));
        assert!(Gate::CX(0, 1).is_inv(&Gate::CX(0, 1)));
        assert!(!Gate::CX(0, 1).is_inv(&Gate::CX(1, 0)));
    }

    #[test]
    fn operation_conversion() {
        let op = Operation::new("cx", vec![9], vec![7]);
        assert_eq!(Gate::try_from(&op).unwrap(), Gate::CX(7, 9));
        assert_eq!(op.qubits().collect::<Vec<_>>(), vec![7, 9]);
        assert_eq!(Operation::from(Gate::CX(7, 9)), op);

        let op = Operation::new("h", vec![0, 1], vec![]);
        assert!(matches!(
            Gate::try_from(&op),
            Err(SimError::InvalidOperand(_))
        ));
        let op = Operation::new("tdg", vec![], vec![]);
        assert!(matches!(
            Gate::try_from(&op),
            Err(SimError::InvalidOperand(_))
        ));
        let op = Operation::new("cx", vec![0], vec![1, 2]);
        assert!(matches!(
            Gate::try_from(&op),
            Err(SimError::InvalidOperand(_))
        ));
        let op = Operation::new("ccx", vec![0], vec![1, 2]);
        assert!(matches!(
            Gate::try_from(&op),
            Err(SimError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn display() {
        assert_eq!(Gate::Tdg(12).to_string(), "tdg q[12]");
        assert_eq!(Gate::CX(7, 9).to_string(), "cx q[7],q[9]");
    }
}
