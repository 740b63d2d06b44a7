//! # Proof System Error Types
//!
//! Errors from setup, proving, and artifact handling. Verification
//! deliberately has no error type — a proof either verifies or it does
//! not, and every failure mode collapses to `false` at the trait boundary.

use thiserror::Error;

/// Errors from Groth16 setup, proving, and artifact I/O.
#[derive(Error, Debug)]
pub enum ZkpError {
    /// Commitment hashing failed (uninitialized hasher, bad scalar).
    #[error("commitment hash error: {0}")]
    Crypto(#[from] ziot_crypto::CryptoError),

    /// Constraint synthesis or proving failed.
    #[error("constraint synthesis error: {0}")]
    Synthesis(#[from] ark_relations::r1cs::SynthesisError),

    /// Key material could not be (de)serialized.
    #[error("key serialization error: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),

    /// Artifact file I/O failed.
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A proof component did not parse as curve coordinates.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_proof_display() {
        let err = ZkpError::MalformedProof("a.x not a field element".to_string());
        assert!(format!("{err}").contains("a.x"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no vkey");
        let err = ZkpError::from(io);
        assert!(format!("{err}").contains("no vkey"));
    }

    #[test]
    fn crypto_error_converts() {
        let err = ZkpError::from(ziot_crypto::CryptoError::NotInitialized);
        assert!(format!("{err}").contains("not initialized"));
    }
}
