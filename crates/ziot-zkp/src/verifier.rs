//! # Proof Verifier
//!
//! The sealed verification seam of the authority. Exactly one production
//! implementation exists: [`Groth16Verifier`], holding a verifying key
//! prepared once at construction. The shape-only [`PermissiveVerifier`]
//! compiles only for test builds; nothing at runtime can select it.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, VerifyingKey};
use std::path::Path;

use ziot_crypto::fr_from_decimal;

use crate::error::ZkpError;
use crate::proof::Proof;

/// Stateless verification of a zero-knowledge proof against ordered public
/// signals.
///
/// Implementations must return `false` — never error — for structurally
/// malformed proofs, and must branch only on the proof and the public
/// values.
pub trait ProofVerifier: Send + Sync {
    /// Check `proof` against `public_signals`.
    fn verify(&self, proof: &Proof, public_signals: &[String]) -> bool;
}

/// Production Groth16 verifier over BN254.
pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
}

impl Groth16Verifier {
    /// Prepare a verifying key for repeated verification.
    pub fn new(verifying_key: VerifyingKey<Bn254>) -> Self {
        Self {
            pvk: prepare_verifying_key(&verifying_key),
        }
    }

    /// Load the immutable verifying key from an artifact file. Called once
    /// at startup; a missing or corrupt key is fatal there.
    pub fn from_file(path: &Path) -> Result<Self, ZkpError> {
        Ok(Self::new(crate::artifacts::load_verifying_key(path)?))
    }

    /// Number of public signals the key expects.
    pub fn expected_signals(&self) -> usize {
        self.pvk.vk.gamma_abc_g1.len().saturating_sub(1)
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(&self, proof: &Proof, public_signals: &[String]) -> bool {
        let parsed = match proof.to_ark() {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(error = %e, "rejecting structurally malformed proof");
                return false;
            }
        };

        if public_signals.len() != self.expected_signals() {
            tracing::debug!(
                got = public_signals.len(),
                expected = self.expected_signals(),
                "rejecting proof with wrong signal count"
            );
            return false;
        }

        let mut signals: Vec<Fr> = Vec::with_capacity(public_signals.len());
        for raw in public_signals {
            match fr_from_decimal(raw) {
                Ok(value) => signals.push(value),
                Err(_) => {
                    tracing::debug!(signal = %raw, "rejecting non-canonical public signal");
                    return false;
                }
            }
        }

        Groth16::<Bn254>::verify_proof(&self.pvk, &parsed, &signals).unwrap_or(false)
    }
}

/// Accepts any structurally well-shaped proof. Test builds only.
///
/// Mirrors the production verifier's structural checks (so shape bugs
/// still surface in tests) but skips the pairing check entirely.
#[cfg(any(test, feature = "permissive-verifier"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveVerifier;

#[cfg(any(test, feature = "permissive-verifier"))]
impl ProofVerifier for PermissiveVerifier {
    fn verify(&self, proof: &Proof, public_signals: &[String]) -> bool {
        proof.to_ark().is_ok()
            && !public_signals.is_empty()
            && public_signals.iter().all(|s| fr_from_decimal(s).is_ok())
    }
}
