//! ICM decomposition pass.

use tracing::debug;

use icm_ir::Circuit;

use crate::engine::Decomposer;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Transformation pass replacing the target gates with ICM gadgets.
///
/// Reads the targets, mode and ancilla naming from the [`PropertySet`] and
/// stores the run's [`DecompositionStats`](crate::DecompositionStats) in it.
pub struct IcmDecomposition;

impl Pass for IcmDecomposition {
    fn name(&self) -> &'static str {
        "icm_decomposition"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let targets = properties
            .targets
            .as_ref()
            .ok_or(CompileError::MissingDecompositionTargets)?;

        let mut decomposer = Decomposer::new(targets, properties.mode)?
            .with_ancillas(properties.ancillas.prefix.clone(), properties.ancillas.first)
            .with_coalescing(properties.coalesce_moments);
        if let Some(extra) = &properties.extra_tags {
            decomposer = decomposer.with_tagged(extra);
        }

        let result = decomposer.run(circuit)?;
        *circuit = result.to_circuit(circuit.name())?;
        debug!(
            "ICM decomposition produced {} qubits and {} operations",
            circuit.num_qubits(),
            circuit.num_ops()
        );

        properties.insert(result.stats().clone());
        Ok(())
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.targets.as_ref().is_none_or(|t| !t.is_empty())
    }
}
