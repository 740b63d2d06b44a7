//! Ledger-facing device id hashing.
//!
//! The ledger never learns raw device ids. Each id is hashed once at the
//! notarization boundary and the ledger keys everything by the digest.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use ziot_core::DeviceId;

/// Lowercase hex SHA-256 of a device id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdHash(String);

impl IdHash {
    /// Hash a device id for ledger use.
    pub fn of(device_id: &DeviceId) -> Self {
        let digest = Sha256::digest(device_id.as_str().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_64_hex_chars() {
        let id = DeviceId::new("dev1").unwrap();
        let hash = IdHash::of(&id);
        assert_eq!(hash.as_str().len(), 64);
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_is_deterministic_and_id_sensitive() {
        let a = IdHash::of(&DeviceId::new("dev1").unwrap());
        let b = IdHash::of(&DeviceId::new("dev1").unwrap());
        let c = IdHash::of(&DeviceId::new("dev2").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn known_vector() {
        // sha256("abc")
        let hash = IdHash::of(&DeviceId::new("abc").unwrap());
        assert_eq!(
            hash.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
