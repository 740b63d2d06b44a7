//! # Device Lifecycle Types
//!
//! The authoritative device record, its three-state lifecycle status, and
//! the ephemeral authentication-attempt record consumed by the ledger
//! notarizer.
//!
//! ## Lifecycle
//!
//! ```text
//! (no record) --register--> Active --revoke--> Revoked
//!       ^                      ^                  |
//!       |                      +---re-register----+   (resurrection)
//! ```
//!
//! Re-registration from any state returns the device to `Active` with a
//! replaced commitment. This is intentional protocol behavior, preserved
//! as-is; see `DeviceRegistry::register` in `ziot-registry`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::identity::{Commitment, DeviceId};

/// Device lifecycle status.
///
/// Persisted as the literal strings `"REGISTERED"`, `"ACTIVE"`, `"REVOKED"`.
/// The local authority only ever writes `Active` and `Revoked`;
/// `Registered` exists for the external ledger mirror, whose contract
/// enumerates all three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    /// Registered on the ledger but not yet activated locally.
    Registered,
    /// Eligible for proof-gated authentication.
    Active,
    /// Authentication refused regardless of proof validity.
    Revoked,
}

impl DeviceStatus {
    /// The persisted string literal for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
        }
    }

    /// Parse a persisted status literal.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "REGISTERED" => Ok(Self::Registered),
            "ACTIVE" => Ok(Self::Active),
            "REVOKED" => Ok(Self::Revoked),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authoritative record for a registered device.
///
/// The registry exclusively owns this; the ledger holds a derived,
/// eventually consistent mirror. `commitment` is always the value bound at
/// the most recent registration. No record is ever physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeviceRecord {
    /// Externally assigned identifier, the registry key.
    pub device_id: DeviceId,
    /// Public commitment bound at the most recent registration.
    pub commitment: Commitment,
    /// Current lifecycle status.
    pub status: DeviceStatus,
    /// First registration time (preserved across re-registrations).
    pub registered_at: DateTime<Utc>,
    /// Last mutation of any field.
    pub updated_at: DateTime<Utc>,
    /// Last successful proof verification, if any.
    pub last_seen: Option<DateTime<Utc>>,
}

impl DeviceRecord {
    /// Build a fresh `Active` record at registration time.
    pub fn new(device_id: DeviceId, commitment: Commitment, now: DateTime<Utc>) -> Self {
        Self {
            device_id,
            commitment,
            status: DeviceStatus::Active,
            registered_at: now,
            updated_at: now,
            last_seen: None,
        }
    }
}

/// One authentication outcome, success or failure.
///
/// Ephemeral: logged locally and handed to the notarizer, never persisted
/// by the registry itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAttempt {
    /// Device that presented (or failed to present) a proof.
    pub device_id: DeviceId,
    /// Whether the full verify pipeline succeeded.
    pub success: bool,
    /// Reason string: `"OK"`, `"Commitment mismatch"`, `"Invalid ZK Proof"`, …
    pub reason: String,
    /// Decision time.
    pub timestamp: DateTime<Utc>,
}
