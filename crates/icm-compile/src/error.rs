//! Error types for the compilation crate.

use thiserror::Error;

use crate::operation_id::OperationId;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] icm_ir::IrError),

    /// Resolving a wire walked deeper than any wire in the arena.
    #[error("Resolution of wire '{wire}' for operation {id} exceeded split depth {bound}")]
    ResolutionExhausted {
        /// Name of the wire being resolved.
        wire: String,
        /// Operation id the wire was resolved for.
        id: OperationId,
        /// Deepest split recorded in the arena.
        bound: u32,
    },

    /// A gate kind was requested for expansion but has no gadget.
    #[error("No ICM gadget for gate '{0}'")]
    UnsupportedDecomposition(String),

    /// An operation id could not be built or parsed.
    #[error("Malformed operation id: {0}")]
    MalformedOperationId(String),

    /// The decomposition pass ran without a target gate set.
    #[error("Missing target gates for ICM decomposition")]
    MissingDecompositionTargets,

    /// Operations other than initialization, CNOT and measurement remain.
    #[error("Circuit is not in ICM form: {count} offending operation(s), first is '{first}'")]
    NotIcmForm {
        /// Number of offending operations.
        count: usize,
        /// Name of the first offending operation.
        first: String,
    },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
