//! Circuit Intermediate Representation for the ICM engine
//!
//! This crate provides the circuit data structures the ICM rewriting engine
//! reads and writes. Circuits address qubits by name as well as by id, since
//! the decomposition output is keyed by wire names.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] and named [`Qubit`]s
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for
//!   anything else
//! - **Instructions**: [`Instruction`] covering gates, state preparation
//!   ([`InitState`]) and measurement ([`MeasureBasis`])
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API with moment grouping
//! - **Descriptions**: [`CircuitDescription`] for reading and writing JSON
//!
//! # Example: An ICM fragment
//!
//! ```rust
//! use icm_ir::{Circuit, InitState, MeasureBasis, QubitId};
//!
//! let mut circuit = Circuit::with_qubits("fragment", ["a", "anc_0"]).unwrap();
//! let (a, anc) = (QubitId(0), QubitId(1));
//!
//! circuit.init(anc, InitState::Y).unwrap();
//! circuit.cx(anc, a).unwrap();
//! circuit.measure_in(a, MeasureBasis::Z).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 3);
//! assert!(circuit.operations().iter().all(|op| op.is_icm()));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ` | 2 | Controlled-Y and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |

pub mod circuit;
pub mod dag;
pub mod description;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, InsertStrategy};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex};
pub use description::{CircuitDescription, OpDescription};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{InitState, Instruction, InstructionKind, MeasureBasis};
pub use qubit::{Qubit, QubitId};
