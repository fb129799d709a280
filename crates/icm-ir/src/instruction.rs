//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::{Gate, GateKind, StandardGate};
use crate::qubit::QubitId;

/// State a fresh wire is prepared in.
///
/// `Plus`, `Y` and `A` correspond to a Hadamard, Hadamard+Phase and
/// Hadamard+T applied to `|0⟩`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitState {
    /// `|0⟩`.
    Zero,
    /// `|+⟩ = H|0⟩`.
    Plus,
    /// `|Y⟩ = S H|0⟩`.
    Y,
    /// Magic state `|A⟩ = T H|0⟩`.
    A,
    /// Conjugate magic state `T† H|0⟩`.
    ADagger,
}

impl InitState {
    /// Whether preparing this state needs a non-Clifford gate.
    pub fn is_magic(self) -> bool {
        matches!(self, InitState::A | InitState::ADagger)
    }
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitState::Zero => "|0>",
            InitState::Plus => "|+>",
            InitState::Y => "|Y>",
            InitState::A => "|A>",
            InitState::ADagger => "|A*>",
        };
        f.write_str(s)
    }
}

/// Basis a measurement is performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeasureBasis {
    /// Computational basis.
    #[default]
    Z,
    /// Hadamard basis.
    X,
}

impl fmt::Display for MeasureBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureBasis::Z => f.write_str("Z"),
            MeasureBasis::X => f.write_str("X"),
        }
    }
}

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Prepare a fresh qubit in a fixed state.
    Init(InitState),
    /// Measurement operation.
    Measure(MeasureBasis),
}

impl InstructionKind {
    /// Get the name of the instruction kind.
    pub fn name(&self) -> &str {
        match self {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Init(_) => "init",
            InstructionKind::Measure(_) => "measure",
        }
    }
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create an instruction from a kind and its operands.
    pub fn new(kind: InstructionKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(InstructionKind::Gate(gate.into()), qubits)
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create an initialization instruction.
    pub fn init(qubit: QubitId, state: InitState) -> Self {
        Self::new(InstructionKind::Init(state), [qubit])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, basis: MeasureBasis) -> Self {
        Self::new(InstructionKind::Measure(basis), [qubit])
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is an initialization.
    pub fn is_init(&self) -> bool {
        matches!(self.kind, InstructionKind::Init(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure(_))
    }

    /// Check if this is a CNOT.
    pub fn is_cnot(&self) -> bool {
        matches!(
            &self.kind,
            InstructionKind::Gate(Gate {
                kind: GateKind::Standard(StandardGate::CX),
                ..
            })
        )
    }

    /// Check if this instruction is allowed in an ICM circuit.
    pub fn is_icm(&self) -> bool {
        self.is_init() || self.is_measure() || self.is_cnot()
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        self.kind.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert!(!inst.is_icm());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_icm_instructions() {
        let init = Instruction::init(QubitId(1), InitState::A);
        assert!(init.is_init());
        assert!(init.is_icm());
        assert_eq!(init.name(), "init");

        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        assert!(cx.is_cnot());
        assert!(cx.is_icm());

        let meas = Instruction::measure(QubitId(0), MeasureBasis::X);
        assert!(meas.is_measure());
        assert!(meas.is_icm());
        assert_eq!(meas.name(), "measure");
    }

    #[test]
    fn test_init_state_magic() {
        assert!(InitState::A.is_magic());
        assert!(InitState::ADagger.is_magic());
        assert!(!InitState::Y.is_magic());
        assert_eq!(InitState::Plus.to_string(), "|+>");
    }
}
