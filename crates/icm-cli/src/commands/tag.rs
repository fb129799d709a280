//! Tag command implementation.

use anyhow::Result;
use console::style;

use icm_compile::{GateSet, TaggedCircuit, Tagger};

use crate::commands::common::{describe_op, load_circuit};

/// Execute the tag command.
pub fn execute(circuit: &str, gates: &str) -> Result<()> {
    let host = load_circuit(circuit)?;
    let tagger = Tagger::new(GateSet::from_names(gates.split(',')));

    let mut tagged = TaggedCircuit::from_circuit(&host);
    let count = tagger.tag(&mut tagged);

    println!(
        "{} Tagged {} of {} operations in {} ({})",
        style("✓").green().bold(),
        count,
        tagged.len(),
        style(host.name()).green(),
        tagger.gates().names().join(",")
    );

    for op in tagged.ops() {
        let names: Vec<String> = op
            .wires
            .iter()
            .map(|&q| host.qubit(q).map_or_else(|| q.to_string(), |q| q.name.clone()))
            .collect();
        let id = op
            .id
            .as_ref()
            .map_or_else(|| style("-".to_string()).dim(), |id| style(id.to_string()).cyan());
        println!("  {:>8}  {}", id, describe_op(&op.kind, &names));
    }

    Ok(())
}
