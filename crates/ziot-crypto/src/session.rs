//! # Session Credentials
//!
//! On successful proof verification the coordinator issues a session
//! credential: an Ed25519-signed claim set binding the device id to an
//! issuance time, expiry, and a unique credential id. This replaces the
//! fixed placeholder token of earlier designs — the credential is signed,
//! time-bound, and device-bound.
//!
//! ## Format
//!
//! `base64url(claims-json) . base64url(signature)`, no padding. Verifiers
//! decode the claims, check the Ed25519 signature over the exact claim
//! bytes, then check expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ziot_core::DeviceId;

use crate::error::CryptoError;

/// Claims carried by a session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Device the credential was issued to.
    pub device_id: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Unique credential id.
    pub jti: Uuid,
}

/// Issues and verifies Ed25519 session credentials.
#[derive(Debug)]
pub struct CredentialIssuer {
    signing_key: SigningKey,
    ttl: Duration,
}

impl CredentialIssuer {
    /// Create an issuer with a freshly generated signing key.
    ///
    /// The key is ephemeral: credentials do not survive an authority
    /// restart, which is acceptable for session-scoped material.
    pub fn generate(ttl_secs: i64) -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Create an issuer from an existing signing key.
    pub fn from_signing_key(signing_key: SigningKey, ttl_secs: i64) -> Self {
        Self {
            signing_key,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Public verification key for issued credentials.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Issue a credential for `device_id` valid from `now` for the
    /// configured TTL.
    pub fn issue(&self, device_id: &DeviceId, now: DateTime<Utc>) -> Result<String, CryptoError> {
        let claims = SessionClaims {
            device_id: device_id.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        let body = serde_json::to_vec(&claims)
            .map_err(|e| CryptoError::InvalidCredential(e.to_string()))?;
        let signature = self.signing_key.sign(&body);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&body),
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }
}

/// Decode a credential, verify its signature, and check expiry.
pub fn verify_credential(
    token: &str,
    verifying_key: &VerifyingKey,
    now: DateTime<Utc>,
) -> Result<SessionClaims, CryptoError> {
    let (body_b64, sig_b64) = token
        .split_once('.')
        .ok_or_else(|| CryptoError::InvalidCredential("missing separator".to_string()))?;
    let body = URL_SAFE_NO_PAD
        .decode(body_b64)
        .map_err(|e| CryptoError::InvalidCredential(format!("claims encoding: {e}")))?;
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|e| CryptoError::InvalidCredential(format!("signature encoding: {e}")))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|e| CryptoError::InvalidCredential(format!("signature length: {e}")))?;

    verifying_key
        .verify(&body, &signature)
        .map_err(|e| CryptoError::InvalidCredential(format!("signature check: {e}")))?;

    let claims: SessionClaims = serde_json::from_slice(&body)
        .map_err(|e| CryptoError::InvalidCredential(format!("claims decode: {e}")))?;

    let expires = DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| CryptoError::InvalidCredential("expiry out of range".to_string()))?;
    if now >= expires {
        return Err(CryptoError::ExpiredCredential(expires));
    }
    Ok(claims)
}
