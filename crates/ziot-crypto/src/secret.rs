//! # Secret Normalization
//!
//! Devices present arbitrary secret strings (provisioning keys, passphrases,
//! serial-derived material). Before committing, the authority reduces the
//! secret to a fixed-width scalar: SHA-256 over the UTF-8 bytes, digest
//! interpreted as a 256-bit big-endian integer, rendered in decimal.
//!
//! The decimal rendering is the protocol's scalar wire format — the same
//! string feeds the commitment hash here and the witness input of the
//! proof circuit in `ziot-zkp`. Reduction into the BN254 scalar field
//! happens at the point of algebraic use, not here, so the normalized
//! form stays a faithful 256-bit image of the secret.

use sha2::{Digest, Sha256};

use crate::field::bytes_be_to_decimal;

/// Deterministically normalize a secret string to a decimal scalar string.
///
/// Identical input yields identical output across calls and process
/// restarts; distinct inputs collide only with SHA-256 collision
/// probability.
pub fn normalize_secret(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    bytes_be_to_decimal(&digest)
}
