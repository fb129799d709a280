//! JSON circuit descriptions.
//!
//! A description names its qubits and lists operations by gate name:
//!
//! ```json
//! {
//!   "name": "example",
//!   "qubits": ["a", "b"],
//!   "ops": [
//!     { "gate": "t", "qubits": ["a"] },
//!     { "gate": "cx", "qubits": ["a", "b"] },
//!     { "gate": "rz", "qubits": ["b"], "params": [0.5] },
//!     { "gate": "init", "qubits": ["a"], "state": "Plus" },
//!     { "gate": "measure", "qubits": ["b"], "basis": "X" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, InsertStrategy};
use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, GateKind, StandardGate};
use crate::instruction::{InitState, Instruction, InstructionKind, MeasureBasis};
use crate::qubit::QubitId;

/// Serializable form of a [`Circuit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Circuit name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Qubit names, in declaration order.
    pub qubits: Vec<String>,
    /// Operations in order.
    #[serde(default)]
    pub ops: Vec<OpDescription>,
}

/// One operation of a [`CircuitDescription`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDescription {
    /// Gate name, or `init` / `measure`.
    pub gate: String,
    /// Names of the qubits acted on.
    pub qubits: Vec<String>,
    /// Gate parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Prepared state for `init`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<InitState>,
    /// Basis for `measure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<MeasureBasis>,
}

fn default_name() -> String {
    "circuit".into()
}

impl CircuitDescription {
    /// Parse a description from JSON.
    pub fn from_json(source: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Render the description as pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe an existing circuit. Operations are listed in moment order.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let name_of = |q: QubitId| {
            circuit
                .qubit(q)
                .map_or_else(|| q.to_string(), |qubit| qubit.name.clone())
        };

        let ops = circuit
            .operations()
            .into_iter()
            .map(|inst| {
                let qubits = inst.qubits.iter().map(|&q| name_of(q)).collect();
                match &inst.kind {
                    InstructionKind::Gate(gate) => OpDescription {
                        gate: gate.name().to_string(),
                        qubits,
                        params: match &gate.kind {
                            GateKind::Standard(g) => g.parameters(),
                            GateKind::Custom(c) => c.params.clone(),
                        },
                        state: None,
                        basis: None,
                    },
                    InstructionKind::Init(state) => OpDescription {
                        gate: "init".into(),
                        qubits,
                        params: vec![],
                        state: Some(*state),
                        basis: None,
                    },
                    InstructionKind::Measure(basis) => OpDescription {
                        gate: "measure".into(),
                        qubits,
                        params: vec![],
                        state: None,
                        basis: Some(*basis),
                    },
                }
            })
            .collect();

        Self {
            name: circuit.name().to_string(),
            qubits: circuit.qubits().iter().map(|q| q.name.clone()).collect(),
            ops,
        }
    }

    /// Build a circuit from this description.
    ///
    /// Unknown gate names are accepted as custom gates only when
    /// `allow_custom` is set; otherwise they are an error.
    pub fn to_circuit(&self, allow_custom: bool) -> IrResult<Circuit> {
        let mut circuit = Circuit::with_qubits(&self.name, &self.qubits)?
            .with_strategy(InsertStrategy::Earliest);

        for op in &self.ops {
            let qubits = op
                .qubits
                .iter()
                .map(|name| {
                    circuit
                        .qubit_id(name)
                        .ok_or_else(|| IrError::UnknownQubitName(name.clone()))
                })
                .collect::<IrResult<Vec<_>>>()?;

            let kind = match op.gate.as_str() {
                "init" => InstructionKind::Init(op.state.unwrap_or(InitState::Zero)),
                "measure" => InstructionKind::Measure(op.basis.unwrap_or_default()),
                name => match StandardGate::from_name(name, &op.params) {
                    Some(gate) => InstructionKind::Gate(gate.into()),
                    None if allow_custom => {
                        let custom = CustomGate::new(name, qubits.len() as u32)
                            .with_params(op.params.clone());
                        InstructionKind::Gate(custom.into())
                    }
                    None => return Err(IrError::UnknownGate(name.to_string())),
                },
            };

            circuit.apply(Instruction::new(kind, qubits))?;
        }

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "sample",
        "qubits": ["a", "b"],
        "ops": [
            { "gate": "t", "qubits": ["a"] },
            { "gate": "cnot", "qubits": ["a", "b"] },
            { "gate": "rz", "qubits": ["b"], "params": [0.25] },
            { "gate": "measure", "qubits": ["b"], "basis": "X" }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let desc = CircuitDescription::from_json(SAMPLE).unwrap();
        let circuit = desc.to_circuit(false).unwrap();

        assert_eq!(circuit.name(), "sample");
        assert_eq!(circuit.num_qubits(), 2);
        let names: Vec<_> = circuit.operations().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["t", "cx", "rz", "measure"]);
    }

    #[test]
    fn test_unknown_gate() {
        let desc = CircuitDescription::from_json(
            r#"{ "qubits": ["a"], "ops": [{ "gate": "frob", "qubits": ["a"] }] }"#,
        )
        .unwrap();

        assert!(matches!(desc.to_circuit(false), Err(IrError::UnknownGate(g)) if g == "frob"));
        let circuit = desc.to_circuit(true).unwrap();
        assert_eq!(circuit.operations()[0].name(), "frob");
    }

    #[test]
    fn test_unknown_qubit() {
        let desc = CircuitDescription::from_json(
            r#"{ "qubits": ["a"], "ops": [{ "gate": "h", "qubits": ["z"] }] }"#,
        )
        .unwrap();
        assert!(matches!(
            desc.to_circuit(false),
            Err(IrError::UnknownQubitName(q)) if q == "z"
        ));
    }

    #[test]
    fn test_describe_circuit() {
        let mut circuit = Circuit::with_qubits("prep", ["a", "anc_0"]).unwrap();
        circuit
            .init(QubitId(1), InitState::A)
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap();

        let desc = CircuitDescription::from_circuit(&circuit);
        assert_eq!(desc.qubits, ["a", "anc_0"]);
        assert_eq!(desc.ops[0].state, Some(InitState::A));
        assert_eq!(desc.ops[1].qubits, ["anc_0", "a"]);

        let rebuilt = CircuitDescription::from_json(&desc.to_json().unwrap())
            .unwrap()
            .to_circuit(false)
            .unwrap();
        assert_eq!(rebuilt.num_ops(), 2);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CircuitDescription::from_json("{ not json"),
            Err(IrError::Description(_))
        ));
    }
}
