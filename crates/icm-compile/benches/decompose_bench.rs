//! Benchmarks for ICM decomposition
//!
//! Run with: cargo bench -p icm-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use icm_compile::{DecompositionMode, Decomposer, GateSet, OperationId, WireArena};
use icm_ir::{Circuit, QubitId};

/// A layered circuit with a T on every qubit between rounds of CNOTs.
fn layered(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("layered", num_qubits);
    for _ in 0..layers {
        for q in 0..num_qubits {
            circuit.t(QubitId(q)).unwrap();
        }
        for q in (0..num_qubits - 1).step_by(2) {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    let decomposer = Decomposer::new(&GateSet::t_gates(), DecompositionMode::Forward).unwrap();

    for layers in &[1u32, 10, 50] {
        let circuit = layered(8, *layers);
        group.bench_with_input(BenchmarkId::new("t_layers", layers), &circuit, |b, circuit| {
            b.iter(|| decomposer.run(black_box(circuit)).unwrap());
        });
    }

    let toffoli = Circuit::toffoli().unwrap();
    group.bench_function("toffoli_to_circuit", |b| {
        b.iter(|| {
            decomposer
                .run(black_box(&toffoli))
                .unwrap()
                .to_circuit("icm")
                .unwrap()
        });
    });

    group.finish();
}

/// Resolution cost on a deeply split wire.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for depth in &[10u64, 100, 1000] {
        let mut arena = WireArena::new();
        let root = arena.add_wire("q");
        for i in 0..*depth {
            arena.split(root, &OperationId::new(i)).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("rightmost", depth), &arena, |b, arena| {
            b.iter(|| arena.resolve(black_box(root), &OperationId::rightmost()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decompose, bench_resolve);
criterion_main!(benches);
