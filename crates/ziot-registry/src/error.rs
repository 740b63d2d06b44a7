//! # Registry Error Types

use thiserror::Error;
use ziot_core::DeviceId;

/// Errors from the storage backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row no longer parses into domain types.
    #[error("corrupt device row: {0}")]
    Corrupt(String),
}

/// Errors from registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No record exists for the device id.
    #[error("device not found: {0}")]
    NotFound(DeviceId),

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
