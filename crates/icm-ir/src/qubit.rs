//! Qubit types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// A named quantum bit.
///
/// Names are unique within a circuit. They are what the ICM engine keys its
/// wire identity map on, so two qubits with the same name would collapse into
/// one logical wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The unique identifier.
    pub id: QubitId,
    /// Human-readable name.
    pub name: String,
}

impl Qubit {
    /// Create a qubit named after its id (`q0`, `q1`, ...).
    pub fn new(id: QubitId) -> Self {
        Self {
            id,
            name: id.to_string(),
        }
    }

    /// Create a qubit with an explicit name.
    pub fn named(id: QubitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Create a qubit that is element `index` of register `register`.
    pub fn with_register(id: QubitId, register: &str, index: u32) -> Self {
        Self::named(id, format!("{register}[{index}]"))
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new(QubitId(0));
        assert_eq!(format!("{q}"), "q0");

        let q_reg = Qubit::with_register(QubitId(1), "qr", 0);
        assert_eq!(format!("{q_reg}"), "qr[0]");

        let named = Qubit::named(QubitId(2), "anc_3");
        assert_eq!(format!("{named}"), "anc_3");
    }
}
