//! # ziot-zkp — Groth16 Proof System for the Identity Authority
//!
//! A device proves knowledge of its secret by presenting a Groth16 proof
//! whose single public signal is the Poseidon commitment on file. This
//! crate owns everything proof-shaped:
//!
//! - **Wire format** ([`proof`]): the `{a, b, c}` triple of decimal-string
//!   curve coordinates plus ordered `publicSignals`, exactly as the
//!   protocol exchanges them.
//! - **Commitment circuit** ([`circuit`]): `commitment = Poseidon(secret)`
//!   as R1CS constraints, sharing parameters with the native hasher in
//!   `ziot-crypto` so prover and authority can never disagree.
//! - **Prover & setup** ([`prover`]): circuit-specific Groth16 setup and
//!   proof generation; artifact (de)serialization in [`artifacts`].
//! - **Verifier** ([`verifier`]): the sealed [`ProofVerifier`] trait with
//!   exactly one production implementation, [`Groth16Verifier`]. A
//!   shape-only permissive verifier exists solely under
//!   `#[cfg(any(test, feature = "permissive-verifier"))]` for test
//!   builds; no runtime configuration can select it.
//!
//! ## Verification Contract
//!
//! `verify` never errors outward: structurally malformed proofs — wrong
//! coordinate encodings, off-curve points, wrong subgroup, signal-count
//! mismatch — yield `false`, as does a failed pairing check. The verifier
//! branches only on the proof and public values, never on any secret.

pub mod artifacts;
pub mod circuit;
pub mod error;
pub mod proof;
pub mod prover;
pub mod verifier;

// Re-export primary types.
pub use artifacts::{load_proving_key, load_verifying_key, save_artifacts};
pub use circuit::CommitmentCircuit;
pub use error::ZkpError;
pub use proof::{Proof, ProofBundle};
pub use prover::{prove, setup, CircuitArtifacts};
pub use verifier::{Groth16Verifier, ProofVerifier};

#[cfg(any(test, feature = "permissive-verifier"))]
pub use verifier::PermissiveVerifier;
