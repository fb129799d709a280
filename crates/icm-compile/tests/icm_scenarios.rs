//! End-to-end decomposition scenarios.

use icm_compile::{
    CompileError, DecompositionMode, Decomposer, GateSet, OperationId, TaggedCircuit, Tagger,
};
use icm_ir::{Circuit, InstructionKind, QubitId};

fn two_t_and_cnot() -> Circuit {
    let mut circuit = Circuit::with_qubits("scenario_a", ["a", "b"]).unwrap();
    circuit
        .t(QubitId(0))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();
    circuit
}

fn mixed() -> Circuit {
    let mut circuit = Circuit::with_qubits("mixed", ["a", "b", "c"]).unwrap();
    let (a, b, c) = (QubitId(0), QubitId(1), QubitId(2));
    circuit
        .t(a)
        .unwrap()
        .t(b)
        .unwrap()
        .cx(a, b)
        .unwrap()
        .s(a)
        .unwrap()
        .cx(b, c)
        .unwrap()
        .t(c)
        .unwrap();
    circuit
}

fn forward(gates: &[&str]) -> Decomposer {
    Decomposer::new(&GateSet::from_names(gates), DecompositionMode::Forward).unwrap()
}

#[test]
fn two_gadgets_and_a_rethreaded_cnot() {
    let result = forward(&["t"]).run(&two_t_and_cnot()).unwrap();

    assert_eq!(result.stats().gadgets, 2);
    assert_eq!(result.stats().ancillas, 10);
    assert_eq!(result.stats().kept, 1);
    assert!(result.retired_references().is_empty());

    let wires = result.wires();
    let cnot = result.ops().last().unwrap();
    assert_eq!(cnot.name(), "cx");
    assert!(cnot.id.is_none());
    assert_eq!(wires.name(cnot.wires[0]), "anc_4");
    assert_eq!(wires.name(cnot.wires[1]), "anc_9");
    for &w in &cnot.wires {
        assert!(!wires.is_retired(w));
    }

    // Each gadget is one block of 6 wires sharing a root.
    let gadget_wires = |root: u32| {
        let mut block: Vec<_> = result
            .ops()
            .iter()
            .filter(|op| op.id.is_some())
            .flat_map(|op| op.wires.iter().copied())
            .filter(|&w| wires.root(w).0 == root)
            .collect();
        block.sort_unstable();
        block.dedup();
        block.len()
    };
    assert_eq!(gadget_wires(0), 6);
    assert_eq!(gadget_wires(1), 6);
}

#[test]
fn tagging_twice_gives_identical_ids() {
    let circuit = mixed();
    let tagger = Tagger::new(GateSet::from_names(["t", "s"]));

    let mut once = TaggedCircuit::from_circuit(&circuit);
    tagger.tag(&mut once);
    let mut twice = once.clone();
    assert_eq!(tagger.tag(&mut twice), 0);
    assert_eq!(once, twice);

    let mut fresh = TaggedCircuit::from_circuit(&circuit);
    tagger.tag(&mut fresh);
    assert_eq!(once, fresh);
}

#[test]
fn level_and_advance_algebra() {
    let five = OperationId::new(5);
    assert_eq!(five.advance().advance(), OperationId::new(7));
    assert_eq!(
        five.enter_level().advance(),
        OperationId::from_components(vec![5, 1]).unwrap()
    );
    assert_ne!(five.enter_level().advance(), OperationId::new(6));
}

#[test]
fn synthesized_ids_stay_between_neighbours() {
    let result = forward(&["t"]).run(&two_t_and_cnot()).unwrap();
    let first = OperationId::new(0);
    let second = OperationId::new(1);

    for op in result.ops().iter().take(15) {
        let id = op.id.as_ref().unwrap();
        assert!(&first < id && id < &second, "{id} not between 0 and 1");
    }
    let ids: Vec<_> = result.ops().iter().filter_map(|op| op.id.clone()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn kept_tagged_gate_follows_gadget_output() {
    let decomposer = forward(&["t"]).with_tagged(&GateSet::from_names(["s"]));
    let result = decomposer.run(&mixed()).unwrap();

    assert_eq!(result.stats().gadgets, 3);
    assert_eq!(result.stats().kept, 3);
    assert!(result.retired_references().is_empty());

    let s = result.ops().iter().find(|op| op.name() == "s").unwrap();
    assert_eq!(s.id, Some(OperationId::new(2)));
    assert_eq!(result.wires().name(s.wires[0]), "anc_4");

    // cx(b, c) is emitted before c's gadget and keeps the original `c`.
    let cx_bc = result.ops().iter().filter(|op| op.name() == "cx").nth(1).unwrap();
    assert_eq!(result.wires().name(cx_bc.wires[0]), "anc_9");
    assert_eq!(result.wires().name(cx_bc.wires[1]), "c");
}

#[test]
fn toffoli_conservation() {
    let circuit = Circuit::toffoli().unwrap();
    let result = forward(&["t", "tdg"]).run(&circuit).unwrap();
    let stats = result.stats();

    assert_eq!(stats.gadgets, 7);
    assert_eq!(stats.kept, circuit.num_ops() - 7);
    assert_eq!(stats.measurements, 7 * 5);
    assert_eq!(stats.magic_states, 7);
    assert_eq!(stats.ancillas, 7 * 5);
    assert_eq!(
        result.ops().len(),
        stats.kept + stats.initializations + stats.cnots + stats.measurements
    );
    assert!(result.retired_references().is_empty());

    let icm = result.to_circuit("toffoli_icm").unwrap();
    assert_eq!(icm.num_qubits(), 3 + 35);
    assert_eq!(icm.num_ops(), result.ops().len());
}

#[test]
fn ancillas_are_initialized_before_use() {
    let result = forward(&["t", "tdg", "h"])
        .run(&Circuit::toffoli().unwrap())
        .unwrap();
    let icm = result.to_circuit("icm").unwrap();

    for qubit in icm.qubits().iter().skip(3) {
        let first = icm
            .operations()
            .into_iter()
            .find(|op| op.qubits.contains(&qubit.id))
            .unwrap();
        assert!(
            matches!(first.kind, InstructionKind::Init(_)),
            "{} starts with {}",
            qubit.name,
            first.name()
        );
    }
}

#[test]
fn unsupported_gate_fails_before_any_work() {
    let err = Decomposer::new(&GateSet::from_names(["t", "rz"]), DecompositionMode::Forward)
        .unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedDecomposition(name) if name == "rz"));
}
