//! # Setup Subcommand
//!
//! Runs the one-time Groth16 trusted setup for the commitment circuit
//! and writes both key artifacts to disk. The verifying key goes to the
//! authority; the proving key goes to device provisioning tooling.
//!
//! ## Commands
//!
//! - `ziot setup --out-dir <dir>` — Generate `proving_key.bin` and
//!   `verifying_key.bin` in `<dir>`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand_core::OsRng;

use ziot_crypto::PoseidonHasher;
use ziot_zkp::artifacts::{PROVING_KEY_FILE, VERIFYING_KEY_FILE};

/// Arguments for the `ziot setup` subcommand.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Output directory for the key artifacts.
    #[arg(long, short, default_value = "./artifacts")]
    pub out_dir: PathBuf,

    /// Overwrite existing artifacts instead of refusing.
    #[arg(long)]
    pub force: bool,
}

/// Run the trusted setup and write artifacts.
pub fn run_setup(args: &SetupArgs) -> Result<u8> {
    let pk_path = args.out_dir.join(PROVING_KEY_FILE);
    if pk_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; re-running setup would invalidate every issued proof (use --force)",
            pk_path.display()
        );
    }

    tracing::info!("Generating Poseidon parameters");
    let hasher = PoseidonHasher::init().context("Poseidon parameter generation failed")?;

    tracing::info!("Running Groth16 trusted setup");
    let artifacts = ziot_zkp::setup(&hasher, &mut OsRng).context("trusted setup failed")?;

    ziot_zkp::save_artifacts(&args.out_dir, &artifacts)
        .with_context(|| format!("Failed to write artifacts to {}", args.out_dir.display()))?;

    println!("Wrote {}", args.out_dir.join(PROVING_KEY_FILE).display());
    println!("Wrote {}", args.out_dir.join(VERIFYING_KEY_FILE).display());
    Ok(0)
}
