//! # Device Registry Facade
//!
//! `DeviceRegistry` wraps the configured [`DeviceStore`] with the
//! domain-level operations the API exposes. None of these methods take
//! the per-device lock themselves; callers running composite sequences
//! (read, check, mutate) hold [`DeviceRegistry::guard`] around them.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use ziot_core::{Commitment, DeviceId, DeviceRecord, DeviceStatus};

use crate::error::RegistryError;
use crate::locks::KeyedLocks;
use crate::store::{DeviceStore, MemoryStore};

/// Domain operations over device records.
#[derive(Clone)]
pub struct DeviceRegistry {
    store: Arc<dyn DeviceStore>,
    locks: Arc<KeyedLocks>,
}

impl DeviceRegistry {
    /// Build a registry over any store backend.
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self {
            store,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Build a registry over a fresh non-durable in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Acquire the serialization lock for one device.
    ///
    /// Hold the returned guard across any composite read-check-mutate
    /// sequence. Registry methods never lock internally, so holding the
    /// guard while calling them cannot deadlock.
    pub async fn guard(&self, device_id: &DeviceId) -> OwnedMutexGuard<()> {
        self.locks.acquire(device_id).await
    }

    /// Register a device, or re-register it with a replaced commitment.
    ///
    /// Re-registration always yields an `Active` record. A previously
    /// revoked device is resurrected; that is accepted protocol behavior
    /// but logged loudly because it usually means a revoked identity was
    /// re-enrolled.
    pub async fn register(
        &self,
        device_id: &DeviceId,
        commitment: &Commitment,
    ) -> Result<DeviceRecord, RegistryError> {
        let previous = self.store.get(device_id).await?;
        if let Some(prev) = &previous {
            if prev.status == DeviceStatus::Revoked {
                tracing::warn!(
                    device_id = %device_id,
                    "re-registering a revoked device; record returns to ACTIVE"
                );
            }
        }
        let record = self.store.upsert(device_id, commitment, Utc::now()).await?;
        Ok(record)
    }

    /// Fetch one device record.
    pub async fn get(&self, device_id: &DeviceId) -> Result<DeviceRecord, RegistryError> {
        self.store
            .get(device_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(device_id.clone()))
    }

    /// Revoke a device. Idempotent: revoking an already revoked device
    /// succeeds without touching the record again.
    pub async fn revoke(&self, device_id: &DeviceId) -> Result<DeviceRecord, RegistryError> {
        let record = self.get(device_id).await?;
        if record.status == DeviceStatus::Revoked {
            return Ok(record);
        }
        let now = Utc::now();
        let updated = self
            .store
            .set_status(device_id, DeviceStatus::Revoked, now)
            .await?;
        if !updated {
            // Record vanished between the read and the write; callers
            // holding guard() never hit this.
            return Err(RegistryError::NotFound(device_id.clone()));
        }
        self.get(device_id).await
    }

    /// Stamp `last_seen` after a successful proof verification.
    pub async fn mark_seen(&self, device_id: &DeviceId) -> Result<(), RegistryError> {
        let updated = self.store.mark_seen(device_id, Utc::now()).await?;
        if !updated {
            return Err(RegistryError::NotFound(device_id.clone()));
        }
        Ok(())
    }
}
