//! # Device Store Trait and In-Memory Backing
//!
//! `DeviceStore` is the persistence seam: every operation is individually
//! atomic, and none of them take the per-device lock. Linearization of
//! composite sequences is the caller's job via [`KeyedLocks`].
//!
//! [`KeyedLocks`]: crate::locks::KeyedLocks

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use ziot_core::{Commitment, DeviceId, DeviceRecord, DeviceStatus};

use crate::error::StoreError;

/// Persistence backend for device records.
///
/// Implemented by [`MemoryStore`] and by `PgStore` when a database is
/// configured.
///
/// [`MemoryStore`]: crate::store::MemoryStore
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Fetch one record by device id.
    async fn get(&self, device_id: &DeviceId) -> Result<Option<DeviceRecord>, StoreError>;

    /// Insert a fresh `Active` record, or overwrite the commitment and
    /// status of an existing one.
    ///
    /// On conflict `registered_at` and `last_seen` are preserved; only
    /// `commitment`, `status` and `updated_at` change. Returns the record
    /// as stored.
    async fn upsert(
        &self,
        device_id: &DeviceId,
        commitment: &Commitment,
        now: DateTime<Utc>,
    ) -> Result<DeviceRecord, StoreError>;

    /// Set the lifecycle status of an existing record.
    ///
    /// Returns `false` when no record matches.
    async fn set_status(
        &self,
        device_id: &DeviceId,
        status: DeviceStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Stamp `last_seen` after a successful verification.
    ///
    /// Returns `false` when no record matches.
    async fn mark_seen(
        &self,
        device_id: &DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Non-durable store used when no `DATABASE_URL` is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: DashMap<String, DeviceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(self.devices.get(device_id.as_str()).map(|r| r.clone()))
    }

    async fn upsert(
        &self,
        device_id: &DeviceId,
        commitment: &Commitment,
        now: DateTime<Utc>,
    ) -> Result<DeviceRecord, StoreError> {
        let record = self
            .devices
            .entry(device_id.as_str().to_string())
            .and_modify(|existing| {
                existing.commitment = commitment.clone();
                existing.status = DeviceStatus::Active;
                existing.updated_at = now;
            })
            .or_insert_with(|| DeviceRecord::new(device_id.clone(), commitment.clone(), now))
            .clone();
        Ok(record)
    }

    async fn set_status(
        &self,
        device_id: &DeviceId,
        status: DeviceStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match self.devices.get_mut(device_id.as_str()) {
            Some(mut record) => {
                record.status = status;
                record.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_seen(
        &self,
        device_id: &DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match self.devices.get_mut(device_id.as_str()) {
            Some(mut record) => {
                record.last_seen = Some(now);
                record.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_id() -> DeviceId {
        DeviceId::new("dev1").unwrap()
    }

    fn commitment(value: &str) -> Commitment {
        Commitment::new(value).unwrap()
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(&device_id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_inserts_active_record() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let rec = store.upsert(&device_id(), &commitment("111"), now).await.unwrap();
        assert_eq!(rec.status, DeviceStatus::Active);
        assert_eq!(rec.registered_at, now);
        assert!(rec.last_seen.is_none());
    }

    #[tokio::test]
    async fn upsert_conflict_preserves_registered_at_and_last_seen() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.upsert(&device_id(), &commitment("111"), t0).await.unwrap();
        let t1 = t0 + chrono::Duration::seconds(5);
        assert!(store.mark_seen(&device_id(), t1).await.unwrap());

        let t2 = t0 + chrono::Duration::seconds(10);
        let rec = store.upsert(&device_id(), &commitment("222"), t2).await.unwrap();
        assert_eq!(rec.commitment.as_str(), "222");
        assert_eq!(rec.registered_at, t0);
        assert_eq!(rec.updated_at, t2);
        assert_eq!(rec.last_seen, Some(t1));
    }

    #[tokio::test]
    async fn upsert_resurrects_revoked_device() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.upsert(&device_id(), &commitment("111"), t0).await.unwrap();
        assert!(store
            .set_status(&device_id(), DeviceStatus::Revoked, t0)
            .await
            .unwrap());

        let rec = store.upsert(&device_id(), &commitment("333"), t0).await.unwrap();
        assert_eq!(rec.status, DeviceStatus::Active);
    }

    #[tokio::test]
    async fn set_status_and_mark_seen_miss_return_false() {
        let store = MemoryStore::new();
        let now = Utc::now();
        assert!(!store
            .set_status(&device_id(), DeviceStatus::Revoked, now)
            .await
            .unwrap());
        assert!(!store.mark_seen(&device_id(), now).await.unwrap());
    }
}
