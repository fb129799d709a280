//! ICM gadgets for the decomposable gates.
//!
//! A gadget replaces one single-qubit gate by a block of fresh wires that are
//! initialized, entangled with CNOTs and measured. Wire 0 of a gadget is the
//! incoming qubit (always measured); the last wire carries the logical qubit
//! onward (never measured).
//!
//! A measurement outcome of 1 on wire `i` is fixed up by Pauli corrections on
//! the wires after it; see [`Gadget::corrections`].

use serde::{Deserialize, Serialize};
use std::fmt;

use icm_ir::{InitState, InstructionKind, MeasureBasis, StandardGate};

/// Direction of the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionMode {
    /// Replace gates by their gadgets.
    #[default]
    Forward,
    /// Use the Clifford-only, reversed templates.
    Inverse,
}

/// The gates that have a gadget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecomposableGate {
    /// `T`.
    T,
    /// `T†`.
    Tdg,
    /// Hadamard.
    H,
    /// `S`.
    S,
    /// `S†`.
    Sdg,
}

impl DecomposableGate {
    /// All decomposable gates.
    pub const ALL: [DecomposableGate; 5] = [Self::T, Self::Tdg, Self::H, Self::S, Self::Sdg];

    /// Look a gate up by instruction name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "t" => Some(Self::T),
            "tdg" => Some(Self::Tdg),
            "h" => Some(Self::H),
            "s" => Some(Self::S),
            "sdg" => Some(Self::Sdg),
            _ => None,
        }
    }

    /// Classify an instruction kind.
    pub fn from_kind(kind: &InstructionKind) -> Option<Self> {
        match kind {
            InstructionKind::Gate(gate) => match gate.as_standard()? {
                StandardGate::T => Some(Self::T),
                StandardGate::Tdg => Some(Self::Tdg),
                StandardGate::H => Some(Self::H),
                StandardGate::S => Some(Self::S),
                StandardGate::Sdg => Some(Self::Sdg),
                _ => None,
            },
            InstructionKind::Init(_) | InstructionKind::Measure(_) => None,
        }
    }

    /// Instruction name of the gate.
    pub fn name(self) -> &'static str {
        match self {
            Self::T => "t",
            Self::Tdg => "tdg",
            Self::H => "h",
            Self::S => "s",
            Self::Sdg => "sdg",
        }
    }

    /// Whether the gate is re-threaded rather than expanded in inverse mode.
    pub fn is_clifford(self) -> bool {
        matches!(self, Self::H | Self::S | Self::Sdg)
    }
}

impl fmt::Display for DecomposableGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pauli frame correction triggered by a gadget measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Correction {
    /// Pauli `X`.
    X,
    /// Pauli `Z`.
    Z,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::Z => f.write_str("Z"),
        }
    }
}

/// Corrections for the four wires following a measured wire.
///
/// Entry `k` applies to wire `i + 1 + k` when wire `i` was measured.
pub fn correction_sequence(outcome: bool) -> [Correction; 4] {
    use Correction::{X, Z};
    if outcome { [Z, X, X, Z] } else { [X, Z, Z, X] }
}

/// Template substituted for one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gadget {
    /// Number of wires the operand is split into.
    pub wires: usize,
    /// State of every ancilla, by wire index.
    pub init: &'static [(usize, InitState)],
    /// `(control, target)` pairs, in emission order.
    pub cnots: &'static [(usize, usize)],
    /// Measured wires and their bases.
    pub measure: &'static [(usize, MeasureBasis)],
}

impl Gadget {
    /// Index of the wire the logical qubit continues on.
    pub fn output(&self) -> usize {
        self.wires - 1
    }

    /// Number of operations the gadget emits.
    pub fn num_ops(&self) -> usize {
        self.init.len() + self.cnots.len() + self.measure.len()
    }

    /// Corrections to apply after measuring wire `measured` with `outcome`.
    ///
    /// Returns `(wire, correction)` pairs, truncated at the gadget's last wire.
    pub fn corrections(&self, measured: usize, outcome: bool) -> Vec<(usize, Correction)> {
        correction_sequence(outcome)
            .into_iter()
            .enumerate()
            .map(|(k, c)| (measured + 1 + k, c))
            .take_while(|(w, _)| *w < self.wires)
            .collect()
    }

    /// Whether any ancilla starts in a magic state.
    pub fn uses_magic_state(&self) -> bool {
        self.init.iter().any(|(_, state)| state.is_magic())
    }
}

use InitState::{A, ADagger, Plus, Y, Zero};
use MeasureBasis::{X as MX, Z as MZ};

const T_MEASURE: &[(usize, MeasureBasis)] = &[(0, MZ), (1, MX), (2, MZ), (3, MX), (4, MZ)];

const T_FORWARD: Gadget = Gadget {
    wires: 6,
    init: &[(1, A), (2, Zero), (3, Y), (4, Plus), (5, Zero)],
    cnots: &[(1, 0), (1, 2), (3, 2), (3, 4), (4, 5)],
    measure: T_MEASURE,
};

const TDG_FORWARD: Gadget = Gadget {
    init: &[(1, ADagger), (2, Zero), (3, Y), (4, Plus), (5, Zero)],
    ..T_FORWARD
};

const T_INVERSE: Gadget = Gadget {
    wires: 6,
    init: &[(1, Plus), (2, Zero), (3, Y), (4, Plus), (5, Zero)],
    cnots: &[(4, 5), (3, 4), (3, 2), (1, 2), (1, 0)],
    measure: T_MEASURE,
};

const H_FORWARD: Gadget = Gadget {
    wires: 4,
    init: &[(1, Plus), (2, Zero), (3, Plus)],
    cnots: &[(1, 0), (1, 2), (3, 2)],
    measure: &[(0, MX), (1, MZ), (2, MX)],
};

const H_INVERSE: Gadget = Gadget {
    cnots: &[(3, 2), (1, 2), (1, 0)],
    ..H_FORWARD
};

const S_FORWARD: Gadget = Gadget {
    wires: 2,
    init: &[(1, Y)],
    cnots: &[(1, 0)],
    measure: &[(0, MZ)],
};

const SDG_FORWARD: Gadget = Gadget {
    wires: 2,
    init: &[(1, Y)],
    cnots: &[(0, 1)],
    measure: &[(0, MX)],
};

/// The gadget for a gate in the given mode.
pub fn gadget(gate: DecomposableGate, mode: DecompositionMode) -> Gadget {
    match (gate, mode) {
        (DecomposableGate::T, DecompositionMode::Forward) => T_FORWARD,
        (DecomposableGate::Tdg, DecompositionMode::Forward) => TDG_FORWARD,
        (DecomposableGate::T | DecomposableGate::Tdg, DecompositionMode::Inverse) => T_INVERSE,
        (DecomposableGate::H, DecompositionMode::Forward) => H_FORWARD,
        (DecomposableGate::H, DecompositionMode::Inverse) => H_INVERSE,
        // Single-CNOT templates read the same in both directions.
        (DecomposableGate::S, _) => S_FORWARD,
        (DecomposableGate::Sdg, _) => SDG_FORWARD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [DecompositionMode; 2] = [DecompositionMode::Forward, DecompositionMode::Inverse];

    fn all() -> impl Iterator<Item = (DecomposableGate, DecompositionMode, Gadget)> {
        DecomposableGate::ALL
            .into_iter()
            .flat_map(|g| MODES.into_iter().map(move |m| (g, m, gadget(g, m))))
    }

    #[test]
    fn test_every_ancilla_initialized_once() {
        for (gate, mode, g) in all() {
            let mut seen: Vec<usize> = g.init.iter().map(|(w, _)| *w).collect();
            seen.sort_unstable();
            let expected: Vec<usize> = (1..g.wires).collect();
            assert_eq!(seen, expected, "{gate} {mode:?}");
        }
    }

    #[test]
    fn test_input_measured_output_kept() {
        for (gate, mode, g) in all() {
            assert!(g.measure.iter().any(|(w, _)| *w == 0), "{gate} {mode:?}");
            assert!(g.measure.iter().all(|(w, _)| *w != g.output()), "{gate} {mode:?}");
        }
    }

    #[test]
    fn test_measurement_counts() {
        for mode in MODES {
            assert_eq!(gadget(DecomposableGate::T, mode).measure.len(), 5);
            assert_eq!(gadget(DecomposableGate::Tdg, mode).measure.len(), 5);
            assert_eq!(gadget(DecomposableGate::H, mode).measure.len(), 3);
            assert_eq!(gadget(DecomposableGate::S, mode).measure.len(), 1);
            assert_eq!(gadget(DecomposableGate::Sdg, mode).measure.len(), 1);
        }
    }

    #[test]
    fn test_indices_in_range_and_connected() {
        for (gate, mode, g) in all() {
            let mut reached = vec![false; g.wires];
            reached[0] = true;
            // Repeat until stable; the graphs are tiny.
            for _ in 0..g.wires {
                for &(c, t) in g.cnots {
                    assert!(c < g.wires && t < g.wires && c != t, "{gate} {mode:?}");
                    if reached[c] || reached[t] {
                        reached[c] = true;
                        reached[t] = true;
                    }
                }
            }
            assert!(reached.iter().all(|r| *r), "{gate} {mode:?} is disconnected");
        }
    }

    #[test]
    fn test_inverse_is_clifford_and_reversed() {
        for gate in DecomposableGate::ALL {
            let forward = gadget(gate, DecompositionMode::Forward);
            let inverse = gadget(gate, DecompositionMode::Inverse);
            assert!(!inverse.uses_magic_state(), "{gate}");

            let mut reversed = forward.cnots.to_vec();
            reversed.reverse();
            assert_eq!(inverse.cnots, reversed.as_slice(), "{gate}");
        }
        assert!(gadget(DecomposableGate::T, DecompositionMode::Forward).uses_magic_state());
    }

    #[test]
    fn test_correction_sequences_are_complementary() {
        use Correction::{X, Z};
        assert_eq!(correction_sequence(false), [X, Z, Z, X]);
        assert_eq!(correction_sequence(true), [Z, X, X, Z]);
    }

    #[test]
    fn test_corrections_stay_inside_the_gadget() {
        let t = gadget(DecomposableGate::T, DecompositionMode::Forward);
        assert_eq!(
            t.corrections(0, true),
            [(1, Correction::Z), (2, Correction::X), (3, Correction::X), (4, Correction::Z)]
        );
        assert_eq!(
            t.corrections(3, false),
            [(4, Correction::X), (5, Correction::Z)]
        );
        assert!(t.corrections(t.output(), true).is_empty());

        for (gate, mode, g) in all() {
            for &(w, _) in g.measure {
                assert!(
                    g.corrections(w, true).iter().all(|(c, _)| *c > w && *c < g.wires),
                    "{gate} {mode:?}"
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        for gate in DecomposableGate::ALL {
            assert_eq!(DecomposableGate::from_name(gate.name()), Some(gate));
        }
        assert_eq!(DecomposableGate::from_name("cx"), None);
        let kind = InstructionKind::Gate(StandardGate::Tdg.into());
        assert_eq!(DecomposableGate::from_kind(&kind), Some(DecomposableGate::Tdg));
    }
}
