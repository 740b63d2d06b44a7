//! # ziot-cli — CLI Tool for the Identity Authority
//!
//! Provides the `ziot` command-line interface for the operations that
//! happen outside the API service:
//!
//! - `ziot setup` — One-time trusted setup; writes proving and verifying
//!   key artifacts.
//! - `ziot prove` — Device-side proving; prints a proof bundle ready to
//!   POST to `/v1/devices/verify`.
//! - `ziot commit` — Derive the public commitment for a secret, for
//!   out-of-band registration checks.
//!
//! The API service only ever reads the verifying key; the proving key
//! stays with device tooling.

pub mod commit;
pub mod prove;
pub mod setup;

use std::path::PathBuf;

/// Default directory for key artifacts, shared by `setup` and `prove`.
pub fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}
