//! # arbiter CLI entry point
//!
//! Parses command-line arguments, loads the configuration, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arbiter_cli::config::{config_path, load_config, run_check_config, CheckConfigArgs};
use arbiter_cli::costs::{run_costs, CostsArgs};
use arbiter_cli::simulate::{run_simulate, SimulateArgs};

/// Arbiter: dispute arbitration with timed appeals and cross-domain relay.
#[derive(Parser, Debug)]
#[command(name = "arbiter", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file. Defaults to `arbiter.yaml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate the configuration file.
    CheckConfig(CheckConfigArgs),

    /// Print the current arbitration and appeal cost.
    Costs(CostsArgs),

    /// Run one dispute through its lifecycle and print the outcome as JSON.
    Simulate(SimulateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let path = config_path(cli.config.as_deref());
    tracing::debug!(config = %path.display(), "arbiter CLI starting");

    let result = match &cli.command {
        Commands::CheckConfig(args) => run_check_config(args, &path),
        Commands::Costs(args) => load_config(&path).and_then(|config| run_costs(args, &config)),
        Commands::Simulate(args) => {
            load_config(&path).and_then(|config| run_simulate(args, &config))
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
