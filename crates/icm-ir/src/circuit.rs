//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{InitState, Instruction, MeasureBasis};
use crate::qubit::{Qubit, QubitId};

/// How operations are grouped into moments.
///
/// The grouping only affects [`Circuit::moments`] and therefore the moment
/// order reported by [`Circuit::operations`]; the per-qubit order of
/// operations is the same under both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsertStrategy {
    /// Every operation goes into the earliest moment in which all of its
    /// qubits are free.
    #[default]
    Earliest,
    /// Every operation gets a moment of its own, in insertion order.
    New,
}

/// A quantum circuit over named qubits.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates and operations.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Qubit lookup by name.
    by_name: FxHashMap<String, QubitId>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Moment grouping.
    strategy: InsertStrategy,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            by_name: FxHashMap::default(),
            dag: CircuitDag::new(),
            strategy: InsertStrategy::default(),
            next_qubit_id: 0,
        }
    }

    /// Create a circuit with `num_qubits` qubits named `q0`, `q1`, ...
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        circuit
    }

    /// Create a circuit with one qubit per name, in the given order.
    pub fn with_qubits(
        name: impl Into<String>,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(name);
        for qubit_name in names {
            circuit.add_named_qubit(qubit_name)?;
        }
        Ok(circuit)
    }

    /// Set the moment grouping strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: InsertStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build a circuit from instructions, preserving their order.
    pub fn from_instructions(
        name: impl Into<String>,
        qubit_names: impl IntoIterator<Item = impl Into<String>>,
        instructions: impl IntoIterator<Item = Instruction>,
        strategy: InsertStrategy,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_qubits(name, qubit_names)?.with_strategy(strategy);
        for inst in instructions {
            circuit.apply(inst)?;
        }
        Ok(circuit)
    }

    /// Add a single qubit named after its id.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        let mut name = id.to_string();
        while self.by_name.contains_key(&name) {
            name.push('\'');
        }
        self.insert_qubit(Qubit::named(id, name))
    }

    /// Add a single qubit with an explicit name.
    pub fn add_named_qubit(&mut self, name: impl Into<String>) -> IrResult<QubitId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(IrError::DuplicateQubitName(name));
        }
        let id = QubitId(self.next_qubit_id);
        Ok(self.insert_qubit(Qubit::named(id, name)))
    }

    /// Add a quantum register with qubits named `name[0]`, `name[1]`, ...
    pub fn add_qreg(&mut self, name: &str, size: u32) -> IrResult<Vec<QubitId>> {
        (0..size)
            .map(|i| self.add_named_qubit(format!("{name}[{i}]")))
            .collect()
    }

    fn insert_qubit(&mut self, qubit: Qubit) -> QubitId {
        let id = qubit.id;
        self.next_qubit_id += 1;
        self.by_name.insert(qubit.name.clone(), id);
        self.qubits.push(qubit);
        self.dag.add_qubit(id);
        id
    }

    /// Append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Prepare a qubit in a fixed state.
    pub fn init(&mut self, qubit: QubitId, state: InitState) -> IrResult<&mut Self> {
        self.apply(Instruction::init(qubit, state))
    }

    /// Measure a qubit in the computational basis.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.measure_in(qubit, MeasureBasis::Z)
    }

    /// Measure a qubit in the given basis.
    pub fn measure_in(&mut self, qubit: QubitId, basis: MeasureBasis) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, basis))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get the moment grouping strategy.
    pub fn strategy(&self) -> InsertStrategy {
        self.strategy
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get the qubits in the circuit, in the order they were added.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Look up a qubit by id.
    pub fn qubit(&self, id: QubitId) -> Option<&Qubit> {
        self.qubits.iter().find(|q| q.id == id)
    }

    /// Look up a qubit id by name.
    pub fn qubit_id(&self, name: &str) -> Option<QubitId> {
        self.by_name.get(name).copied()
    }

    /// Group the operations into moments.
    pub fn moments(&self) -> Vec<Vec<&Instruction>> {
        match self.strategy {
            InsertStrategy::New => self.dag.ops().map(|(_, inst)| vec![inst]).collect(),
            InsertStrategy::Earliest => {
                let layers = self.dag.layers();
                let mut moments: Vec<Vec<&Instruction>> = vec![];
                for (node, inst) in self.dag.ops() {
                    let layer = layers[&node];
                    if moments.len() <= layer {
                        moments.resize_with(layer + 1, Vec::new);
                    }
                    moments[layer].push(inst);
                }
                moments
            }
        }
    }

    /// Operations in moment order: moment by moment, and by insertion order
    /// within a moment.
    pub fn operations(&self) -> Vec<&Instruction> {
        self.moments().into_iter().flatten().collect()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a GHZ state preparation circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }

        Ok(circuit)
    }

    /// Create a Toffoli gate expanded into Clifford+T (7 T-type gates).
    pub fn toffoli() -> IrResult<Self> {
        let mut circuit = Self::with_size("toffoli", 3);
        let (a, b, c) = (QubitId(0), QubitId(1), QubitId(2));

        circuit
            .h(c)?
            .cx(b, c)?
            .tdg(c)?
            .cx(a, c)?
            .t(c)?
            .cx(b, c)?
            .tdg(c)?
            .cx(a, c)?
            .t(b)?
            .t(c)?
            .h(c)?
            .cx(a, b)?
            .t(a)?
            .tdg(b)?
            .cx(a, b)?;

        Ok(circuit)
    }
}
