//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use icm_ir::Circuit;

use crate::config::IcmConfig;
use crate::error::CompileResult;
use crate::gadget::DecompositionMode;
use crate::pass::Pass;
use crate::passes::{IcmDecomposition, IcmFormVerification};
use crate::property::{AncillaNaming, PropertySet};
use crate::tagging::GateSet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, qubits: {}, ops: {}",
            circuit.num_qubits(),
            circuit.num_ops()
        );

        Ok(())
    }

    /// Names of the passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the ICM pipeline.
pub struct PassManagerBuilder {
    /// Target properties.
    properties: PropertySet,
    /// Verification after decomposition: `None` to skip, `Some(strict)`.
    verify: Option<bool>,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            properties: PropertySet::new(),
            verify: Some(false),
        }
    }

    /// Configure the builder from validated settings.
    pub fn from_config(config: &IcmConfig) -> CompileResult<Self> {
        config.validate()?;
        let mut builder = Self::new().with_targets(config.gate_set(), config.mode());
        builder.properties.ancillas = AncillaNaming {
            prefix: config.ancilla_prefix.clone(),
            first: config.first_ancilla,
        };
        builder.properties.coalesce_moments = config.coalesce_moments;
        Ok(builder.with_verification(config.verify.then_some(false)))
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the gates to expand and the decomposition direction.
    #[must_use]
    pub fn with_targets(mut self, targets: GateSet, mode: DecompositionMode) -> Self {
        self.properties.targets = Some(targets);
        self.properties.mode = mode;
        self
    }

    /// Choose whether to verify the output, and whether a violation fails.
    #[must_use]
    pub fn with_verification(mut self, strict: Option<bool>) -> Self {
        self.verify = strict;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.properties.targets.is_some() {
            pm.add_pass(IcmDecomposition);
        }

        match self.verify {
            Some(true) => pm.add_pass(IcmFormVerification::strict()),
            Some(false) => pm.add_pass(IcmFormVerification::new()),
            None => {}
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
