//! # Validation Error Types
//!
//! Structured errors for domain-type construction failures. Uses `thiserror`
//! for ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors raised when constructing core domain types from untrusted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Device identifier is empty or whitespace-only.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// Device identifier exceeds the storage bound.
    #[error("device id too long: {0} bytes (max {max})", max = crate::identity::MAX_DEVICE_ID_LEN)]
    DeviceIdTooLong(usize),

    /// Commitment string is not a decimal field element.
    #[error("commitment must be a non-empty decimal string, got {0:?}")]
    InvalidCommitment(String),

    /// Status string does not match a known lifecycle state.
    #[error("unknown device status: {0:?}")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_device_id_display() {
        let err = ValidationError::EmptyDeviceId;
        assert!(format!("{err}").contains("empty"));
    }

    #[test]
    fn device_id_too_long_display() {
        let err = ValidationError::DeviceIdTooLong(1000);
        let msg = format!("{err}");
        assert!(msg.contains("1000"));
        assert!(msg.contains("max"));
    }

    #[test]
    fn invalid_commitment_display() {
        let err = ValidationError::InvalidCommitment("0xdead".to_string());
        assert!(format!("{err}").contains("0xdead"));
    }

    #[test]
    fn unknown_status_display() {
        let err = ValidationError::UnknownStatus("SLEEPING".to_string());
        assert!(format!("{err}").contains("SLEEPING"));
    }
}
