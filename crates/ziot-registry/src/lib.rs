//! # ziot-registry — Durable Device Registry
//!
//! The registry exclusively owns the authoritative [`DeviceRecord`]s; the
//! external ledger only ever holds a derived mirror. Storage is pluggable
//! behind the async [`DeviceStore`] trait:
//!
//! - [`MemoryStore`]: in-process, for development and tests.
//! - [`PgStore`]: PostgreSQL via SQLx with embedded migrations. The
//!   database is **optional** — when `DATABASE_URL` is unset the service
//!   runs memory-only (state does not survive restarts).
//!
//! ## Linearizability
//!
//! Operations on the *same* device id must be serialized so a verify in
//! flight never reads a commitment a concurrent re-registration is midway
//! through replacing. [`KeyedLocks`] provides the per-device mutex;
//! [`DeviceRegistry::guard`] hands composite callers (the auth
//! coordinator) the lock for the span of a read-check-mutate sequence.
//! Distinct devices never contend.
//!
//! [`DeviceRecord`]: ziot_core::DeviceRecord

pub mod error;
pub mod locks;
pub mod postgres;
pub mod registry;
pub mod store;

// Re-export primary types.
pub use error::{RegistryError, StoreError};
pub use locks::KeyedLocks;
pub use postgres::{init_pool, PgStore};
pub use registry::DeviceRegistry;
pub use store::{DeviceStore, MemoryStore};
