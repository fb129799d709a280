//! Decompose command implementation.

use anyhow::Result;
use console::style;
use tracing::debug;

use icm_compile::{DecompositionStats, IcmFormReport, PassManagerBuilder};

use crate::commands::common::{load_circuit, print_circuit, save_circuit};
use crate::config::{self, split_list};

/// Arguments of the decompose command.
pub struct DecomposeArgs<'a> {
    pub circuit: &'a str,
    pub gates: Option<&'a str>,
    pub inverse: bool,
    pub config: Option<&'a str>,
    pub output: Option<&'a str>,
    pub coalesce: bool,
    pub strict: bool,
}

/// Execute the decompose command.
pub fn execute(args: &DecomposeArgs<'_>) -> Result<()> {
    let mut config = config::load(args.config)?;
    if let Some(gates) = args.gates {
        config.gates = split_list(gates);
    }
    config.inverse |= args.inverse;
    config.coalesce_moments |= args.coalesce;
    config.verify |= args.strict;
    debug!("Effective configuration: {:?}", config);

    println!(
        "{} Decomposing {} (gates: {}, {})",
        style("→").cyan().bold(),
        style(args.circuit).green(),
        style(config.gates.join(",")).yellow(),
        if config.inverse { "inverse" } else { "forward" }
    );

    let mut circuit = load_circuit(args.circuit)?;
    println!(
        "  Loaded: {} qubits, {} ops, depth {}",
        circuit.num_qubits(),
        circuit.num_ops(),
        circuit.depth()
    );

    let builder = PassManagerBuilder::from_config(&config)?;
    let builder = if args.strict {
        builder.with_verification(Some(true))
    } else {
        builder
    };
    let (pm, mut props) = builder.build();
    pm.run(&mut circuit, &mut props)?;

    let stats = props.get::<DecompositionStats>().cloned().unwrap_or_default();
    println!("{} Decomposition complete", style("✓").green().bold());
    println!(
        "  Result: {} qubits, {} ops, {} gadgets, {} ancillas, {} measurements",
        circuit.num_qubits(),
        circuit.num_ops(),
        stats.gadgets,
        stats.ancillas,
        stats.measurements
    );
    for (gate, count) in &stats.gadgets_by_gate {
        println!("    {gate}: {count}");
    }

    if let Some(report) = props.get::<IcmFormReport>() {
        if report.passed {
            println!("  ICM form: {}", style("yes").green());
        } else {
            println!(
                "  ICM form: {} ({} other operations)",
                style("no").yellow(),
                report.offending.len()
            );
        }
    }

    print_circuit(&circuit);

    if let Some(path) = args.output {
        save_circuit(&circuit, path)?;
        println!("  Output: {}", style(path).green());
    }

    Ok(())
}
