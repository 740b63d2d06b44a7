//! # ziot-core — Core Domain Types for the Device Identity Authority
//!
//! This crate provides the domain vocabulary shared by every other crate
//! in the workspace:
//!
//! - **Identifier newtypes** ([`identity`]): [`DeviceId`] and [`Commitment`]
//!   validate their contents at construction time, so the rest of the stack
//!   never handles a blank device id or a non-numeric commitment string.
//! - **Device lifecycle** ([`device`]): [`DeviceRecord`], the three-state
//!   [`DeviceStatus`] and the ephemeral [`AuthAttempt`] produced by every
//!   verification outcome.
//! - **Validation errors** ([`error`]): structured `thiserror` enums.
//!
//! ## Crate Policy
//!
//! No I/O, no async, no cryptography — pure data types. The commitment
//! *value* lives here; how it is computed lives in `ziot-crypto`.

pub mod device;
pub mod error;
pub mod identity;

// Re-export primary types.
pub use device::{AuthAttempt, DeviceRecord, DeviceStatus};
pub use error::ValidationError;
pub use identity::{Commitment, DeviceId};
