//! The ICM decomposition engine.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use icm_ir::{
    Circuit, InsertStrategy, Instruction, InstructionKind, IrError, QubitId, StandardGate,
};

use crate::error::{CompileError, CompileResult};
use crate::gadget::{DecomposableGate, DecompositionMode, gadget};
use crate::operation_id::OperationId;
use crate::tagging::{GateSet, TaggedCircuit, TaggedOp, Tagger};
use crate::wire::{WireArena, WireId};

/// Counters collected during one decomposition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionStats {
    /// Gadgets substituted.
    pub gadgets: usize,
    /// Gadgets substituted, per gate name.
    pub gadgets_by_gate: BTreeMap<String, usize>,
    /// Operations re-emitted unchanged apart from their wires.
    pub kept: usize,
    /// Ancilla wires created.
    pub ancillas: u64,
    /// Initializations emitted by gadgets.
    pub initializations: usize,
    /// CNOTs emitted by gadgets.
    pub cnots: usize,
    /// Measurements emitted by gadgets.
    pub measurements: usize,
    /// Ancillas prepared in a magic state.
    pub magic_states: usize,
}

/// Rewrites selected single-qubit gates into ICM gadgets.
///
/// # Example
///
/// ```rust
/// use icm_compile::{Decomposer, DecompositionMode, GateSet};
/// use icm_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::with_qubits("demo", ["a", "b"]).unwrap();
/// circuit.t(QubitId(0)).unwrap();
/// circuit.cx(QubitId(0), QubitId(1)).unwrap();
///
/// let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
/// let result = decomposer.run(&circuit).unwrap();
///
/// assert_eq!(result.stats().gadgets, 1);
/// assert_eq!(result.stats().ancillas, 5);
/// ```
#[derive(Debug, Clone)]
pub struct Decomposer {
    expand: Vec<DecomposableGate>,
    tagger: Tagger,
    mode: DecompositionMode,
    ancilla_prefix: String,
    first_ancilla: u64,
    strategy: InsertStrategy,
}

impl Decomposer {
    /// Create a decomposer expanding the gates named in `gates`.
    ///
    /// Fails with [`CompileError::UnsupportedDecomposition`] if a name has no
    /// gadget. In inverse mode `h`, `s` and `sdg` are re-threaded instead of
    /// expanded.
    pub fn new(gates: &GateSet, mode: DecompositionMode) -> CompileResult<Self> {
        let mut expand = gates
            .names()
            .into_iter()
            .map(|name| {
                DecomposableGate::from_name(name)
                    .ok_or_else(|| CompileError::UnsupportedDecomposition(name.to_string()))
            })
            .collect::<CompileResult<Vec<_>>>()?;

        if mode == DecompositionMode::Inverse {
            expand.retain(|g| !g.is_clifford());
        }

        let tag_set = GateSet::from_names(expand.iter().map(|g| g.name()));

        Ok(Self {
            expand,
            tagger: Tagger::new(tag_set),
            mode,
            ancilla_prefix: WireArena::DEFAULT_ANCILLA_PREFIX.to_string(),
            first_ancilla: 0,
            strategy: InsertStrategy::New,
        })
    }

    /// Also tag the gates named in `extra` without expanding them.
    ///
    /// Tagged gates that are not expanded resolve their wires against their
    /// own id instead of the newest wire version.
    #[must_use]
    pub fn with_tagged(mut self, extra: &GateSet) -> Self {
        let mut tags = self.tagger.gates().union(extra);
        if self.mode == DecompositionMode::Inverse {
            for gate in DecomposableGate::ALL.iter().filter(|g| g.is_clifford()) {
                tags.remove(gate.name());
            }
        }
        self.tagger = Tagger::new(tags);
        self
    }

    /// Name ancillas `<prefix><n>` starting at `n = first`.
    #[must_use]
    pub fn with_ancillas(mut self, prefix: impl Into<String>, first: u64) -> Self {
        self.ancilla_prefix = prefix.into();
        self.first_ancilla = first;
        self
    }

    /// Group output operations into ASAP moments instead of one per moment.
    #[must_use]
    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.strategy = if coalesce {
            InsertStrategy::Earliest
        } else {
            InsertStrategy::New
        };
        self
    }

    /// Gates that will be expanded.
    pub fn expanded_gates(&self) -> &[DecomposableGate] {
        &self.expand
    }

    /// Gates that will be tagged.
    pub fn tagged_gates(&self) -> &GateSet {
        self.tagger.gates()
    }

    /// Decomposition direction.
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Decompose a circuit.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &Circuit) -> CompileResult<Decomposition> {
        let mut wires = WireArena::with_ancillas(self.ancilla_prefix.clone(), self.first_ancilla);
        let roots: FxHashMap<QubitId, WireId> = circuit
            .qubits()
            .iter()
            .map(|q| (q.id, wires.add_wire(q.name.as_str())))
            .collect();

        let mut tagged = TaggedCircuit::from_circuit(circuit).map_wires(|q| {
            roots
                .get(&q)
                .copied()
                .ok_or(IrError::QubitNotFound {
                    qubit: q,
                    gate_name: None,
                })
        })?;
        let num_tagged = self.tagger.tag(&mut tagged);
        debug!("Tagged {} of {} operations", num_tagged, tagged.len());

        let mut queue: VecDeque<TaggedOp<WireId>> = tagged.into_ops().into();
        let mut ops = Vec::with_capacity(queue.len());
        let mut stats = DecompositionStats::default();

        while let Some(op) = queue.pop_front() {
            let lvl = op.id.as_ref().map(OperationId::enter_level);
            let gate = DecomposableGate::from_kind(&op.kind).filter(|g| self.expand.contains(g));

            match (gate, lvl) {
                (Some(gate), Some(lvl)) => {
                    self.expand(&mut wires, &mut ops, &mut stats, &op, gate, &lvl)?;
                }
                (_, lvl) => {
                    let at = if op.wires.len() > 1 || matches!(op.kind, InstructionKind::Measure(_)) {
                        OperationId::rightmost()
                    } else {
                        lvl.unwrap_or_else(OperationId::rightmost)
                    };
                    let resolved = op
                        .wires
                        .iter()
                        .map(|&w| wires.resolve(w, &at))
                        .collect::<CompileResult<Vec<_>>>()?;
                    ops.push(TaggedOp {
                        kind: op.kind,
                        wires: resolved,
                        id: op.id,
                    });
                    stats.kept += 1;
                }
            }
        }

        // Operations emitted before a wire was split precede the split and
        // belong to its continuation.
        for op in &mut ops {
            for w in &mut op.wires {
                if wires.is_retired(*w) {
                    *w = wires.resolve(*w, &OperationId::leftmost())?;
                }
            }
        }

        stats.ancillas = wires.ancillas_created();
        info!(
            "Decomposed {} gadget(s), kept {} operation(s), created {} ancilla(s)",
            stats.gadgets, stats.kept, stats.ancillas
        );

        Ok(Decomposition {
            wires,
            ops,
            stats,
            strategy: self.strategy,
        })
    }

    fn expand(
        &self,
        wires: &mut WireArena,
        ops: &mut Vec<TaggedOp<WireId>>,
        stats: &mut DecompositionStats,
        op: &TaggedOp<WireId>,
        gate: DecomposableGate,
        lvl: &OperationId,
    ) -> CompileResult<()> {
        let &[wire] = op.wires.as_slice() else {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: 1,
                got: op.wires.len() as u32,
            }
            .into());
        };

        let template = gadget(gate, self.mode);
        let block = wires.split_n(wire, template.wires, lvl)?;

        let mut next = lvl.clone();
        let mut emit = |kind: InstructionKind, on: Vec<WireId>| {
            next = next.advance();
            ops.push(TaggedOp::new(kind, on).with_id(next.clone()));
        };

        for &(w, state) in template.init {
            emit(InstructionKind::Init(state), vec![block[w]]);
        }
        for &(control, target) in template.cnots {
            emit(
                InstructionKind::Gate(StandardGate::CX.into()),
                vec![block[control], block[target]],
            );
        }
        for &(w, basis) in template.measure {
            emit(InstructionKind::Measure(basis), vec![block[w]]);
        }

        debug!(
            "Expanded {} at {} on '{}' into {} wires",
            gate,
            lvl,
            wires.name(wire),
            template.wires
        );

        stats.gadgets += 1;
        *stats.gadgets_by_gate.entry(gate.name().to_string()).or_default() += 1;
        stats.initializations += template.init.len();
        stats.cnots += template.cnots.len();
        stats.measurements += template.measure.len();
        stats.magic_states += template
            .init
            .iter()
            .filter(|(_, state)| state.is_magic())
            .count();

        Ok(())
    }
}

/// Result of [`Decomposer::run`].
#[derive(Debug, Clone)]
pub struct Decomposition {
    wires: WireArena,
    ops: Vec<TaggedOp<WireId>>,
    stats: DecompositionStats,
    strategy: InsertStrategy,
}

impl Decomposition {
    /// The wire arena, including retired wires.
    pub fn wires(&self) -> &WireArena {
        &self.wires
    }

    /// Emitted operations, in emission order.
    pub fn ops(&self) -> &[TaggedOp<WireId>] {
        &self.ops
    }

    /// Counters for this run.
    pub fn stats(&self) -> &DecompositionStats {
        &self.stats
    }

    /// Indices of operations that act on a retired wire.
    pub fn retired_references(&self) -> Vec<usize> {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| op.wires.iter().any(|&w| self.wires.is_retired(w)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Names of the output qubits, one per line, in creation order.
    pub fn wire_names(&self) -> Vec<Arc<str>> {
        self.wires
            .lines()
            .map(|w| self.wires.name_arc(w))
            .collect()
    }

    /// Rebuild a host circuit with one qubit per line of the wire arena.
    pub fn to_circuit(&self, name: impl Into<String>) -> CompileResult<Circuit> {
        let lines: Vec<WireId> = self.wires.lines().collect();
        let qubit_of: FxHashMap<WireId, QubitId> = lines
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, QubitId::from(i)))
            .collect();

        let instructions = self.ops.iter().map(|op| {
            Instruction::new(
                op.kind.clone(),
                op.wires.iter().map(|&w| qubit_of[&self.wires.line(w)]),
            )
        });

        Ok(Circuit::from_instructions(
            name,
            lines.iter().map(|&w| self.wires.name(w).to_string()),
            instructions,
            self.strategy,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_ir::{InitState, MeasureBasis};

    fn single_t() -> Circuit {
        let mut circuit = Circuit::with_qubits("single", ["a"]).unwrap();
        circuit.t(QubitId(0)).unwrap();
        circuit
    }

    #[test]
    fn test_unknown_gate_rejected_at_construction() {
        let err = Decomposer::new(&GateSet::from_names(["t", "cx"]), DecompositionMode::Forward)
            .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedDecomposition(g) if g == "cx"));
    }

    #[test]
    fn test_single_t_gadget() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let result = decomposer.run(&single_t()).unwrap();

        assert_eq!(result.ops().len(), 5 + 5 + 5);
        assert_eq!(result.stats().magic_states, 1);
        assert_eq!(result.stats().kept, 0);

        let first = &result.ops()[0];
        assert_eq!(first.kind, InstructionKind::Init(InitState::A));
        assert_eq!(first.id.as_ref().unwrap().to_string(), "0.1");
        assert_eq!(result.ops()[14].id.as_ref().unwrap().to_string(), "0.15");

        let names: Vec<_> = result.wire_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["a", "anc_0", "anc_1", "anc_2", "anc_3", "anc_4"]);
    }

    #[test]
    fn test_output_wire_never_measured() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let result = decomposer.run(&single_t()).unwrap();
        let output = result
            .wires()
            .resolve(WireId(0), &OperationId::rightmost())
            .unwrap();

        assert_eq!(result.wires().name(output), "anc_4");
        assert!(
            result
                .ops()
                .iter()
                .filter(|op| matches!(op.kind, InstructionKind::Measure(_)))
                .all(|op| op.wires[0] != output)
        );
    }

    #[test]
    fn test_inverse_rethreads_cliffords() {
        let mut circuit = Circuit::with_qubits("inv", ["a"]).unwrap();
        circuit.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().s(QubitId(0)).unwrap();

        let decomposer =
            Decomposer::new(&GateSet::decomposable(), DecompositionMode::Inverse).unwrap();
        assert_eq!(decomposer.expanded_gates(), [DecomposableGate::T]);

        let result = decomposer.run(&circuit).unwrap();
        assert_eq!(result.stats().gadgets, 1);
        assert_eq!(result.stats().kept, 2);
        assert_eq!(result.stats().magic_states, 0);

        // `s` follows the gadget and lands on its output wire.
        let last = result.ops().last().unwrap();
        assert_eq!(last.name(), "s");
        assert_eq!(result.wires().name(last.wires[0]), "anc_4");
        // `h` precedes it and stays on the input wire.
        assert_eq!(result.wires().name(result.ops()[0].wires[0]), "a");
    }

    #[test]
    fn test_kept_tagged_gate_resolves_against_its_level() {
        let mut circuit = Circuit::with_qubits("kept", ["a"]).unwrap();
        circuit.t(QubitId(0)).unwrap().s(QubitId(0)).unwrap();

        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward)
            .unwrap()
            .with_tagged(&GateSet::from_names(["s"]));
        let result = decomposer.run(&circuit).unwrap();

        let s = result.ops().last().unwrap();
        assert_eq!(s.id.as_ref().unwrap().to_string(), "1");
        assert_eq!(result.wires().name(s.wires[0]), "anc_4");
    }

    #[test]
    fn test_custom_ancilla_names() {
        let decomposer = Decomposer::new(&GateSet::from_names(["s"]), DecompositionMode::Forward)
            .unwrap()
            .with_ancillas("aux", 10);
        let mut circuit = Circuit::with_qubits("s", ["a"]).unwrap();
        circuit.s(QubitId(0)).unwrap();

        let result = decomposer.run(&circuit).unwrap();
        let names: Vec<_> = result.wire_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["a", "aux10"]);
        assert_eq!(
            result.ops()[2].kind,
            InstructionKind::Measure(MeasureBasis::Z)
        );
    }

    #[test]
    fn test_runs_are_independent() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let first = decomposer.run(&single_t()).unwrap();
        let second = decomposer.run(&single_t()).unwrap();
        assert_eq!(first.wire_names(), second.wire_names());
        assert_eq!(first.ops(), second.ops());
    }

    #[test]
    fn test_to_circuit() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let circuit = decomposer.run(&single_t()).unwrap().to_circuit("icm").unwrap();

        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_ops(), 15);
        assert_eq!(circuit.moments().len(), 15);
        assert!(circuit.operations().iter().all(|op| op.is_icm()));
    }

    #[test]
    fn test_input_qubit_named_like_an_ancilla_stays_distinct() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let mut circuit = Circuit::with_qubits("clash", ["a", "anc_0"]).unwrap();
        circuit.t(QubitId(0)).unwrap().x(QubitId(1)).unwrap();

        let result = decomposer.run(&circuit).unwrap();
        let names: Vec<_> = result.wire_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["a", "anc_0", "anc_1", "anc_2", "anc_3", "anc_4", "anc_5"]);

        let rebuilt = result.to_circuit("icm").unwrap();
        assert_eq!(rebuilt.num_qubits(), 7);
        let x = rebuilt
            .operations()
            .into_iter()
            .find(|op| op.name() == "x")
            .unwrap();
        assert_eq!(x.qubits, [QubitId(1)]);
    }

    #[test]
    fn test_single_qubit_named_like_an_ancilla() {
        let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();
        let mut circuit = Circuit::with_qubits("clash", ["anc_0"]).unwrap();
        circuit.t(QubitId(0)).unwrap();

        let rebuilt = decomposer.run(&circuit).unwrap().to_circuit("icm").unwrap();
        assert_eq!(rebuilt.num_qubits(), 6);
        assert_eq!(rebuilt.qubit_id("anc_5"), Some(QubitId(5)));
        assert!(rebuilt.operations().iter().all(|op| op.is_icm()));
    }
}
