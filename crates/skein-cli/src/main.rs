//! Skein Command-Line Interface
//!
//! Routes `OpenQASM` 2.0 circuits onto restricted coupling maps.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{layout, route, version};

/// Skein - segment-based qubit mapping and routing
#[derive(Parser)]
#[command(name = "skein")]
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
    /// Route a circuit onto a coupling map
    Route {
        /// Input circuit (OpenQASM 2.0)
        circuit: String,

        /// Coupling map: a file (text or JSON) or a preset such as grid:3x3
        coupling: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Gate latencies: single-qubit, two-qubit, swap
        #[arg(long, num_args = 3, value_names = ["L1", "L2", "LSWAP"])]
        latency: Option<Vec<u32>>,

        /// Mapper configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Skip the verification pass
        #[arg(long)]
        no_verify: bool,
    },

    /// Search a single initial mapping for the whole circuit
    Layout {
        /// Input circuit (OpenQASM 2.0)
        circuit: String,

        /// Coupling map: a file (text or JSON) or a preset such as grid:3x3
        coupling: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Route {
            circuit,
            coupling,
            output,
            latency,
            config,
            no_verify,
        } => route::execute(
            &circuit,
            &coupling,
            output.as_deref(),
            latency.as_deref(),
            config.as_deref(),
            !no_verify,
        ),

        Commands::Layout { circuit, coupling } => layout::execute(&circuit, &coupling),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
