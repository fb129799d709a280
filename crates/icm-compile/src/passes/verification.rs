//! Verification pass for ICM form.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use icm_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of ICM form verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmFormReport {
    /// Whether only initializations, CNOTs and measurements remain.
    pub passed: bool,
    /// Number of initializations.
    pub initializations: usize,
    /// Number of CNOTs.
    pub cnots: usize,
    /// Number of measurements.
    pub measurements: usize,
    /// Names of the offending operations, in moment order.
    pub offending: Vec<String>,
}

/// Analysis pass checking that a circuit is in ICM form.
///
/// The report is stored as an [`IcmFormReport`] property. In strict mode a
/// violation fails the pass with [`CompileError::NotIcmForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IcmFormVerification {
    strict: bool,
}

impl IcmFormVerification {
    /// Report violations without failing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on violations.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Inspect a circuit.
    pub fn inspect(circuit: &Circuit) -> IcmFormReport {
        let mut report = IcmFormReport::default();
        for inst in circuit.operations() {
            if inst.is_init() {
                report.initializations += 1;
            } else if inst.is_measure() {
                report.measurements += 1;
            } else if inst.is_cnot() {
                report.cnots += 1;
            } else {
                report.offending.push(inst.name().to_string());
            }
        }
        report.passed = report.offending.is_empty();
        report
    }
}

impl Pass for IcmFormVerification {
    fn name(&self) -> &'static str {
        "icm_form_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let report = Self::inspect(circuit);
        debug!(
            "ICM form: {} init, {} cnot, {} measure, {} other",
            report.initializations,
            report.cnots,
            report.measurements,
            report.offending.len()
        );

        let violation = report.offending.first().map(|first| CompileError::NotIcmForm {
            count: report.offending.len(),
            first: first.clone(),
        });
        if !report.passed {
            warn!(
                "Circuit '{}' is not in ICM form: {} operation(s) remain",
                circuit.name(),
                report.offending.len()
            );
        }
        properties.insert(report);

        match violation {
            Some(err) if self.strict => Err(err),
            _ => Ok(()),
        }
    }
}
