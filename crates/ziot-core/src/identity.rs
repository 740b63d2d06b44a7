//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for the identity authority. Each identifier is
//! a distinct type — you cannot pass a [`Commitment`] where a [`DeviceId`]
//! is expected.
//!
//! ## Validation
//!
//! Both newtypes validate at construction time. Deserialization routes
//! through the `new()` constructor so that invalid values are rejected at
//! the wire boundary, not silently accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Upper bound on device id length, matching the registry column width.
pub const MAX_DEVICE_ID_LEN: usize = 256;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// An opaque, externally assigned device identifier.
///
/// The authority does not interpret the contents beyond non-emptiness and a
/// length bound; manufacturers assign these (serial numbers, MAC-derived
/// ids, UUIDs — all opaque here).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "dev-a1b2c3")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and wrap a raw device id string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if raw.len() > MAX_DEVICE_ID_LEN {
            return Err(ValidationError::DeviceIdTooLong(raw.len()));
        }
        Ok(Self(raw))
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl_validating_deserialize!(DeviceId);

/// A public commitment to a device secret: a BN254 scalar-field element
/// rendered as a decimal string.
///
/// The commitment is public by protocol design — it binds to the secret
/// without revealing it, and is what `publicSignals[0]` of a presented
/// proof must equal. This type validates the *format* (non-empty, ASCII
/// digits); field-range checks belong to `ziot-crypto`, which is the only
/// crate that interprets the value algebraically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "18973249160172963008394728435771")]
pub struct Commitment(String);

impl Commitment {
    /// Validate and wrap a decimal commitment string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidCommitment(raw));
        }
        Ok(Self(raw))
    }

    /// Access the decimal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl_validating_deserialize!(Commitment);
