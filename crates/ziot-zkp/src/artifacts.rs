//! # Key Artifact I/O
//!
//! Proving and verifying keys are produced once by the trusted setup
//! (`ziot setup`) and loaded at startup: the authority loads only the
//! verifying key; the prover tooling loads both. Compressed arkworks
//! canonical serialization, one file per key.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::ZkpError;
use crate::prover::CircuitArtifacts;

/// File name for the proving key inside an artifact directory.
pub const PROVING_KEY_FILE: &str = "proving_key.bin";

/// File name for the verifying key inside an artifact directory.
pub const VERIFYING_KEY_FILE: &str = "verifying_key.bin";

/// Write both keys into `dir`, creating it if needed.
pub fn save_artifacts(dir: &Path, artifacts: &CircuitArtifacts) -> Result<(), ZkpError> {
    std::fs::create_dir_all(dir)?;

    let pk_file = File::create(dir.join(PROVING_KEY_FILE))?;
    artifacts
        .proving_key
        .serialize_compressed(BufWriter::new(pk_file))?;

    let vk_file = File::create(dir.join(VERIFYING_KEY_FILE))?;
    artifacts
        .verifying_key
        .serialize_compressed(BufWriter::new(vk_file))?;

    Ok(())
}

/// Load a proving key from a file path.
pub fn load_proving_key(path: &Path) -> Result<ProvingKey<Bn254>, ZkpError> {
    let file = File::open(path)?;
    Ok(ProvingKey::deserialize_compressed(BufReader::new(file))?)
}

/// Load a verifying key from a file path.
pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey<Bn254>, ZkpError> {
    let file = File::open(path)?;
    Ok(VerifyingKey::deserialize_compressed(BufReader::new(file))?)
}
