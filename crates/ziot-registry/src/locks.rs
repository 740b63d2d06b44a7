//! # Per-Device Keyed Locks
//!
//! Each device id is an independent aggregate: operations on one device
//! must serialize, operations on different devices must not contend. A
//! `DashMap` of `tokio` mutexes gives exactly that — the map shard lock is
//! held only long enough to clone the `Arc`, never across an await.
//!
//! Lock entries are created on first use and kept for the process
//! lifetime; the per-device footprint is one `Arc<Mutex<()>>`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use ziot_core::DeviceId;

/// A map of independent async mutexes keyed by device id.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one device, waiting behind earlier holders.
    ///
    /// The guard is owned, so callers may hold it across awaits for the
    /// span of a composite read-check-mutate sequence.
    pub async fn acquire(&self, device_id: &DeviceId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(device_id.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
