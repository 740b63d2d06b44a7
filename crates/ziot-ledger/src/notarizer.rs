//! # Fire-and-Forget Notarization
//!
//! `Notarizer` is what the request path actually holds. Every method
//! hashes the device id, spawns a detached task, and returns
//! immediately; the handler never awaits the ledger. Failures inside the
//! task are logged as warnings and dropped.

use std::sync::Arc;

use ziot_core::{AuthAttempt, Commitment, DeviceId, DeviceStatus};

use crate::client::LedgerNotarizer;
use crate::hash::IdHash;

/// Non-blocking front of a [`LedgerNotarizer`].
#[derive(Clone)]
pub struct Notarizer {
    ledger: Arc<dyn LedgerNotarizer>,
}

impl Notarizer {
    pub fn new(ledger: Arc<dyn LedgerNotarizer>) -> Self {
        Self { ledger }
    }

    /// Notarize a registration. Returns before the ledger is contacted.
    pub fn register_device(&self, device_id: &DeviceId, commitment: &Commitment) {
        let ledger = self.ledger.clone();
        let id_hash = IdHash::of(device_id);
        let commitment = commitment.clone();
        tokio::spawn(async move {
            if let Err(e) = ledger.register_device(&id_hash, &commitment).await {
                tracing::warn!(%id_hash, "ledger registration notarization failed: {e}");
            }
        });
    }

    /// Notarize a status change. Returns before the ledger is contacted.
    pub fn set_status(&self, device_id: &DeviceId, status: DeviceStatus) {
        let ledger = self.ledger.clone();
        let id_hash = IdHash::of(device_id);
        tokio::spawn(async move {
            if let Err(e) = ledger.set_status(&id_hash, status).await {
                tracing::warn!(%id_hash, %status, "ledger status notarization failed: {e}");
            }
        });
    }

    /// Notarize an authentication outcome. Returns before the ledger is
    /// contacted.
    pub fn log_auth(&self, attempt: &AuthAttempt) {
        let ledger = self.ledger.clone();
        let id_hash = IdHash::of(&attempt.device_id);
        let success = attempt.success;
        let reason = attempt.reason.clone();
        let timestamp = attempt.timestamp;
        tokio::spawn(async move {
            if let Err(e) = ledger.log_auth(&id_hash, success, &reason, timestamp).await {
                tracing::warn!(%id_hash, success, "ledger auth notarization failed: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::error::LedgerError;

    #[derive(Default)]
    struct CountingLedger {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LedgerNotarizer for CountingLedger {
        async fn register_device(
            &self,
            _id_hash: &IdHash,
            _commitment: &Commitment,
        ) -> Result<(), LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn set_status(
            &self,
            _id_hash: &IdHash,
            _status: DeviceStatus,
        ) -> Result<(), LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn log_auth(
            &self,
            _id_hash: &IdHash,
            _success: bool,
            _reason: &str,
            _timestamp: chrono::DateTime<Utc>,
        ) -> Result<(), LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// A ledger that blocks forever, proving the caller never waits on it.
    struct StuckLedger;

    #[async_trait]
    impl LedgerNotarizer for StuckLedger {
        async fn register_device(
            &self,
            _id_hash: &IdHash,
            _commitment: &Commitment,
        ) -> Result<(), LedgerError> {
            std::future::pending().await
        }

        async fn set_status(
            &self,
            _id_hash: &IdHash,
            _status: DeviceStatus,
        ) -> Result<(), LedgerError> {
            std::future::pending().await
        }

        async fn log_auth(
            &self,
            _id_hash: &IdHash,
            _success: bool,
            _reason: &str,
            _timestamp: chrono::DateTime<Utc>,
        ) -> Result<(), LedgerError> {
            std::future::pending().await
        }
    }

    fn device_id() -> DeviceId {
        DeviceId::new("dev1").unwrap()
    }

    #[tokio::test]
    async fn spawned_tasks_reach_the_ledger() {
        let ledger = Arc::new(CountingLedger::default());
        let notarizer = Notarizer::new(ledger.clone());

        notarizer.register_device(&device_id(), &Commitment::new("1").unwrap());
        notarizer.set_status(&device_id(), DeviceStatus::Revoked);
        notarizer.log_auth(&AuthAttempt {
            device_id: device_id(),
            success: true,
            reason: "OK".to_string(),
            timestamp: Utc::now(),
        });

        // Give the detached tasks a moment to run.
        for _ in 0..50 {
            if ledger.calls.load(Ordering::SeqCst) == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn caller_does_not_block_on_a_stuck_ledger() {
        let notarizer = Notarizer::new(Arc::new(StuckLedger));
        let start = std::time::Instant::now();
        notarizer.register_device(&device_id(), &Commitment::new("1").unwrap());
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
