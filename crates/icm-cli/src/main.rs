//! ICM Command-Line Interface
//!
//! Rewrites circuits into Initialize-CNOT-Measure form and inspects the
//! intermediate steps.
//!
//! ```text
//! icm decompose --circuit toffoli --gates t,tdg,h
//! icm tag --circuit scenario --gates t,s
//! icm gadgets --inverse
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{decompose, gadgets, tag};

/// ICM - rewrite quantum circuits into Initialize-CNOT-Measure form
#[derive(Parser)]
#[command(name = "icm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose a circuit into ICM form
    Decompose {
        /// Builtin circuit (scenario, toffoli, ghz-<n>) or JSON file
        #[arg(short, long)]
        circuit: String,

        /// Comma-separated gates to expand (e.g. t,tdg,h)
        #[arg(short, long)]
        gates: Option<String>,

        /// Use the inverse (Clifford-only) templates
        #[arg(long)]
        inverse: bool,

        /// YAML configuration file
        #[arg(long)]
        config: Option<String>,

        /// Write the decomposed circuit as JSON
        #[arg(short, long)]
        output: Option<String>,

        /// Group output operations into ASAP moments
        #[arg(long)]
        coalesce: bool,

        /// Fail if the output is not in ICM form
        #[arg(long)]
        strict: bool,
    },

    /// Print the operation ids assigned by tagging
    Tag {
        /// Builtin circuit (scenario, toffoli, ghz-<n>) or JSON file
        #[arg(short, long)]
        circuit: String,

        /// Comma-separated gates to tag
        #[arg(short, long, default_value = "t,tdg")]
        gates: String,
    },

    /// Print the gadget table
    Gadgets {
        /// Show the inverse templates
        #[arg(long)]
        inverse: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_env("ICM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Decompose {
            circuit,
            gates,
            inverse,
            config,
            output,
            coalesce,
            strict,
        } => decompose::execute(&decompose::DecomposeArgs {
            circuit: &circuit,
            gates: gates.as_deref(),
            inverse,
            config: config.as_deref(),
            output: output.as_deref(),
            coalesce,
            strict,
        }),

        Commands::Tag { circuit, gates } => tag::execute(&circuit, &gates),

        Commands::Gadgets { inverse } => {
            gadgets::execute(inverse);
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
