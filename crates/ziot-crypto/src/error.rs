//! # Cryptographic Error Types
//!
//! Structured errors for all cryptographic operations in `ziot-crypto`.
//! Uses `thiserror` for ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors from cryptographic operations in the identity authority.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The commitment hash subsystem has not completed its one-time
    /// parameter initialization. Retryable: callers should try again once
    /// startup finishes.
    #[error("commitment hasher not initialized")]
    NotInitialized,

    /// Requested a hash arity no parameter set was generated for.
    #[error("unsupported hash arity: {0} (max {max})", max = crate::poseidon::MAX_ARITY)]
    UnsupportedArity(usize),

    /// A decimal string did not parse as a field element.
    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),

    /// Parameter generation produced an unusable value.
    #[error("parameter generation failed: {0}")]
    ParameterGeneration(String),

    /// A session credential failed structural or signature checks.
    #[error("invalid session credential: {0}")]
    InvalidCredential(String),

    /// A session credential was well-formed but past its expiry.
    #[error("session credential expired at {0}")]
    ExpiredCredential(chrono::DateTime<chrono::Utc>),
}
