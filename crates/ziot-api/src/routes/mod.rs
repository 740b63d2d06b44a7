//! # API Route Modules
//!
//! - `devices` — device lifecycle and proof-gated authentication:
//!   register, verify, revoke, status lookup, and the opt-in `prove`
//!   helper (`dev-prover` feature).
//! - `telemetry` — behavior-guard telemetry ingestion; anomalous devices
//!   are revoked through the same path as administrative revocation.

pub mod devices;
pub mod telemetry;
