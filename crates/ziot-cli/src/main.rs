//! # ziot CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ziot_cli::commit::{run_commit, CommitArgs};
use ziot_cli::prove::{run_prove, ProveArgs};
use ziot_cli::setup::{run_setup, SetupArgs};

/// ZIoT identity authority tooling.
///
/// Trusted setup, device-side proving, and commitment derivation. The
/// API service itself runs as `ziot-api`.
#[derive(Parser, Debug)]
#[command(name = "ziot", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the one-time Groth16 trusted setup and write key artifacts.
    Setup(SetupArgs),

    /// Generate a proof bundle for a device secret.
    Prove(ProveArgs),

    /// Derive the public commitment for a device secret.
    Commit(CommitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Setup(args) => run_setup(&args),
        Commands::Prove(args) => run_prove(&args),
        Commands::Commit(args) => run_commit(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
