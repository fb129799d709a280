//! ICM Rewriting Engine
//!
//! This crate rewrites quantum circuits into Initialize-CNOT-Measure (ICM)
//! form: selected single-qubit gates are replaced by gadgets built only from
//! qubit initializations, CNOTs and measurements, with fresh ancilla wires
//! threaded through the circuit.
//!
//! # Overview
//!
//! - [`OperationId`]: hierarchical, totally ordered operation tags
//! - [`WireArena`]: split wires and their resolution by operation id
//! - [`Tagger`]: assigns ids to the operations of a [`TaggedCircuit`]
//! - [`gadget()`]: the gadget table for `T`, `T†`, `H`, `S` and `S†`
//! - [`Decomposer`]: the engine itself
//! - [`PassManager`]: pass pipeline wrapping the engine and an ICM form check
//!
//! # Architecture
//!
//! ```text
//! Circuit ──► re-host on root wires ──► tag ──► drain queue ──► Decomposition
//!                                                 │
//!                                   gadget: split_n + init/CNOT/measure
//!                                   other:  resolve wires and re-emit
//! ```
//!
//! # Example
//!
//! ```rust
//! use icm_compile::{IcmConfig, PassManagerBuilder};
//! use icm_ir::Circuit;
//!
//! let (pm, mut props) = PassManagerBuilder::from_config(&IcmConfig::default())
//!     .unwrap()
//!     .build();
//!
//! let mut circuit = Circuit::toffoli().unwrap();
//! pm.run(&mut circuit, &mut props).unwrap();
//!
//! // Only the CNOTs and the two Hadamards survive besides the gadgets.
//! assert!(circuit.operations().iter().filter(|op| !op.is_icm()).count() == 2);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gadget;
pub mod manager;
pub mod operation_id;
pub mod pass;
pub mod property;
pub mod tagging;
pub mod wire;

// Built-in passes
pub mod passes;

pub use config::IcmConfig;
pub use engine::{Decomposer, Decomposition, DecompositionStats};
pub use error::{CompileError, CompileResult};
pub use gadget::{
    Correction, DecomposableGate, DecompositionMode, Gadget, correction_sequence, gadget,
};
pub use manager::{PassManager, PassManagerBuilder};
pub use operation_id::OperationId;
pub use pass::{Pass, PassKind};
pub use passes::{IcmDecomposition, IcmFormReport, IcmFormVerification};
pub use property::{AncillaNaming, PropertySet};
pub use tagging::{GateSet, TaggedCircuit, TaggedOp, Tagger};
pub use wire::{WireArena, WireId};
