//! Decomposition settings.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::gadget::{DecomposableGate, DecompositionMode};
use crate::tagging::GateSet;
use crate::wire::WireArena;

/// Settings for an ICM decomposition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IcmConfig {
    /// Gates to expand into gadgets.
    #[serde(default = "default_gates")]
    pub gates: Vec<String>,

    /// Use the inverse (Clifford-only) templates.
    #[serde(default)]
    pub inverse: bool,

    /// Prefix for ancilla wire names.
    #[serde(default = "default_ancilla_prefix")]
    pub ancilla_prefix: String,

    /// Index of the first ancilla.
    #[serde(default)]
    pub first_ancilla: u64,

    /// Group the output into ASAP moments.
    #[serde(default)]
    pub coalesce_moments: bool,

    /// Check the output is in ICM form.
    #[serde(default = "default_true")]
    pub verify: bool,
}

fn default_gates() -> Vec<String> {
    vec!["t".to_string(), "tdg".to_string()]
}

fn default_ancilla_prefix() -> String {
    WireArena::DEFAULT_ANCILLA_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for IcmConfig {
    fn default() -> Self {
        Self {
            gates: default_gates(),
            inverse: false,
            ancilla_prefix: default_ancilla_prefix(),
            first_ancilla: 0,
            coalesce_moments: false,
            verify: true,
        }
    }
}

impl IcmConfig {
    /// The expansion set.
    pub fn gate_set(&self) -> GateSet {
        GateSet::from_names(&self.gates)
    }

    /// The decomposition direction.
    pub fn mode(&self) -> DecompositionMode {
        if self.inverse {
            DecompositionMode::Inverse
        } else {
            DecompositionMode::Forward
        }
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> CompileResult<()> {
        if self.ancilla_prefix.trim().is_empty() {
            return Err(CompileError::InvalidConfiguration(
                "ancilla_prefix must not be empty".into(),
            ));
        }

        if let Some(name) = self
            .gate_set()
            .names()
            .into_iter()
            .find(|name| DecomposableGate::from_name(name).is_none())
        {
            return Err(CompileError::InvalidConfiguration(format!(
                "gate '{name}' has no ICM gadget"
            )));
        }

        Ok(())
    }
}
