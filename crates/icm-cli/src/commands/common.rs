//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use icm_ir::{Circuit, CircuitDescription, InstructionKind, QubitId};

/// Names accepted by [`load_circuit`] besides file paths.
pub const BUILTINS: &str = "scenario, toffoli, ghz-<n>";

/// Load a builtin circuit or a JSON circuit description.
pub fn load_circuit(source: &str) -> Result<Circuit> {
    if let Some(circuit) = builtin(source)? {
        return Ok(circuit);
    }

    let path = Path::new(source);
    if !path.exists() {
        anyhow::bail!("No builtin circuit or file named '{source}'. Builtins: {BUILTINS}");
    }

    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {source}"))?;
    let description = CircuitDescription::from_json(&contents)
        .with_context(|| format!("Failed to parse circuit description: {source}"))?;
    Ok(description.to_circuit(true)?)
}

fn builtin(name: &str) -> Result<Option<Circuit>> {
    let circuit = match name.to_lowercase().as_str() {
        "scenario" => scenario()?,
        "toffoli" => Circuit::toffoli()?,
        other => match other.strip_prefix("ghz-") {
            Some(n) => {
                let n: u32 = n
                    .parse()
                    .with_context(|| format!("Invalid GHZ size in '{name}'"))?;
                Circuit::ghz(n)?
            }
            None => return Ok(None),
        },
    };
    Ok(Some(circuit))
}

/// Three qubits with T gates interleaved with CNOTs and an S.
pub fn scenario() -> Result<Circuit> {
    let mut circuit = Circuit::with_qubits("scenario", ["a", "b", "c"])?;
    let (a, b, c) = (QubitId(0), QubitId(1), QubitId(2));
    circuit.t(a)?.t(b)?.cx(a, b)?.s(a)?.cx(b, c)?.t(c)?;
    Ok(circuit)
}

/// Write a circuit as a JSON description.
pub fn save_circuit(circuit: &Circuit, path: &str) -> Result<()> {
    let json = CircuitDescription::from_circuit(circuit).to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))?;
    Ok(())
}

/// Format one operation as `name[detail] q0, q1`.
pub fn describe_op(kind: &InstructionKind, qubits: &[String]) -> String {
    let detail = match kind {
        InstructionKind::Init(state) => format!(" {state}"),
        InstructionKind::Measure(basis) => format!(" {basis}"),
        InstructionKind::Gate(_) => String::new(),
    };
    format!("{}{} {}", kind.name(), detail, qubits.join(", "))
}

/// Print the operations of a circuit in moment order.
pub fn print_circuit(circuit: &Circuit) {
    for (i, moment) in circuit.moments().iter().enumerate() {
        for inst in moment {
            let names: Vec<String> = inst
                .qubits
                .iter()
                .map(|&q| circuit.qubit(q).map_or_else(|| q.to_string(), |q| q.name.clone()))
                .collect();
            println!(
                "  {:>4}  {}",
                style(i).dim(),
                describe_op(&inst.kind, &names)
            );
        }
    }
}
