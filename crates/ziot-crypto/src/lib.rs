//! # ziot-crypto — Cryptographic Primitives for the Identity Authority
//!
//! This crate provides the cryptographic building blocks used throughout
//! the workspace:
//!
//! - **Secret normalization** ([`secret`]): deterministic reduction of an
//!   arbitrary secret string to a fixed-width integer, rendered as the
//!   decimal string the rest of the protocol speaks.
//! - **Commitment hashing** ([`poseidon`]): a Poseidon-style algebraic
//!   hash over the BN254 scalar field. Parameter generation is the
//!   expensive one-time initialization the protocol requires; consumers
//!   reach the hasher only through a [`HasherHandle`] readiness gate.
//! - **Field codec** ([`field`]): decimal-string ↔ field-element
//!   conversion shared with the proof system in `ziot-zkp`.
//! - **Session credentials** ([`session`]): Ed25519-signed, time-bound,
//!   device-bound tokens issued on successful verification.
//!
//! ## Initialization Invariant
//!
//! Every hashing operation requires that [`PoseidonHasher::init`] has
//! completed and the result was installed into the process's
//! [`HasherHandle`]. Calling through an empty handle fails with
//! [`CryptoError::NotInitialized`] — there is no implicit first-use
//! initialization anywhere in this crate.

pub mod error;
pub mod field;
pub mod poseidon;
pub mod secret;
pub mod session;

// Re-export primary types.
pub use error::CryptoError;
pub use field::{fp_from_decimal, fp_to_decimal, fr_from_decimal, fr_from_decimal_mod, fr_to_decimal};
pub use poseidon::{HasherHandle, PoseidonHasher, PoseidonParams};
pub use secret::normalize_secret;
pub use session::{verify_credential, CredentialIssuer, SessionClaims};
