//! # ziot-ledger — Best-Effort Ledger Notarization
//!
//! Mirrors registry mutations and authentication outcomes onto an
//! external ledger service. The mirror is strictly *derived* state: the
//! registry in `ziot-registry` remains authoritative, and no ledger
//! outcome ever changes an authentication decision.
//!
//! Design rules:
//!
//! - Device ids never leave the authority in the clear; the ledger sees
//!   only [`IdHash`], the SHA-256 of the id.
//! - All calls go through [`Notarizer`], which spawns fire-and-forget
//!   tasks. Failures are logged as warnings and dropped, so a slow or
//!   dead ledger cannot stall the request path.
//! - Transport errors retry with exponential backoff; HTTP error
//!   statuses do not (the request reached the ledger, replaying it
//!   would double-notarize).
//!
//! When `LEDGER_URL` is unset the [`NoopLedger`] stands in and every
//! notarization is a silent success.

pub mod client;
pub mod error;
pub mod hash;
pub mod notarizer;

mod retry;

// Re-export primary types.
pub use client::{HttpLedger, LedgerNotarizer, NoopLedger};
pub use error::LedgerError;
pub use hash::IdHash;
pub use notarizer::Notarizer;
