//! Gadgets command implementation.

use console::style;

use icm_compile::{DecomposableGate, DecompositionMode, gadget};

/// Execute the gadgets command.
pub fn execute(inverse: bool) {
    let mode = if inverse {
        DecompositionMode::Inverse
    } else {
        DecompositionMode::Forward
    };

    println!("{} ICM gadgets ({:?})", style("→").cyan().bold(), mode);

    for gate in DecomposableGate::ALL {
        let g = gadget(gate, mode);
        println!(
            "\n  {} ({} wires, output wire {})",
            style(gate).green().bold(),
            g.wires,
            g.output()
        );

        let init: Vec<String> = g.init.iter().map(|(w, s)| format!("{w}:{s}")).collect();
        let cnots: Vec<String> = g.cnots.iter().map(|(c, t)| format!("{c}->{t}")).collect();
        let measure: Vec<String> = g.measure.iter().map(|(w, b)| format!("{w}:{b}")).collect();

        println!("    init:    {}", init.join("  "));
        println!("    cnot:    {}", cnots.join("  "));
        println!("    measure: {}", measure.join("  "));

        let fixes: Vec<String> = g
            .measure
            .iter()
            .map(|(w, _)| {
                let on: Vec<String> = g
                    .corrections(*w, true)
                    .iter()
                    .map(|(t, c)| format!("{c}{t}"))
                    .collect();
                format!("{w}->{}", on.join(","))
            })
            .collect();
        println!("    fix(1): {}", fixes.join("  "));
    }
}
