//! # Prove Subcommand
//!
//! Device-side proving: loads the proving key, re-derives the
//! commitment from the secret, and prints a proof bundle as JSON. The
//! output is exactly the `proof` and `publicSignals` shape that
//! `POST /v1/devices/verify` expects.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand_core::OsRng;
use zeroize::Zeroize;

use ziot_crypto::PoseidonHasher;
use ziot_zkp::artifacts::PROVING_KEY_FILE;

/// Arguments for the `ziot prove` subcommand.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// The device secret to prove knowledge of.
    #[arg(long)]
    pub secret: String,

    /// Directory holding the proving key from `ziot setup`.
    #[arg(long, default_value = "./artifacts")]
    pub artifacts_dir: PathBuf,
}

/// Generate a proof bundle and print it to stdout.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let pk_path = args.artifacts_dir.join(PROVING_KEY_FILE);
    let proving_key = ziot_zkp::load_proving_key(&pk_path)
        .with_context(|| format!("Failed to load {} (run `ziot setup` first)", pk_path.display()))?;

    tracing::info!("Generating Poseidon parameters");
    let hasher = PoseidonHasher::init().context("Poseidon parameter generation failed")?;

    let mut secret = args.secret.clone();
    let bundle = ziot_zkp::prove(&hasher, &proving_key, &secret, &mut OsRng);
    secret.zeroize();
    let bundle = bundle.context("proof generation failed")?;

    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(0)
}
