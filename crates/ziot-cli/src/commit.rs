//! # Commit Subcommand
//!
//! Derives the public Poseidon commitment for a secret without touching
//! the proof system. Useful for checking what `/v1/devices/register`
//! will store, or for provisioning scripts that pre-compute commitments.

use anyhow::{Context, Result};
use clap::Args;
use zeroize::Zeroize;

use ziot_crypto::{normalize_secret, PoseidonHasher};

/// Arguments for the `ziot commit` subcommand.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// The device secret to commit to.
    #[arg(long)]
    pub secret: String,
}

/// Print the commitment for a secret.
pub fn run_commit(args: &CommitArgs) -> Result<u8> {
    tracing::info!("Generating Poseidon parameters");
    let hasher = PoseidonHasher::init().context("Poseidon parameter generation failed")?;

    let mut normalized = normalize_secret(&args.secret);
    let commitment = hasher.commitment(&normalized);
    normalized.zeroize();
    let commitment = commitment.context("commitment derivation failed")?;

    println!("{commitment}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_is_deterministic() {
        let hasher = PoseidonHasher::init().unwrap();
        let a = hasher.commitment(&normalize_secret("hunter2")).unwrap();
        let b = hasher.commitment(&normalize_secret("hunter2")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn run_commit_succeeds() {
        let args = CommitArgs {
            secret: "hunter2".to_string(),
        };
        assert_eq!(run_commit(&args).unwrap(), 0);
    }
}
