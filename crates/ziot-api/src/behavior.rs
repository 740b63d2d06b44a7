//! # Behavior Guard
//!
//! Telemetry-driven anomaly detection. Two rules, evaluated on every
//! telemetry event:
//!
//! 1. Flooding: more than `max_events_per_minute` events from one device
//!    inside a sliding 60 second window.
//! 2. Payload spike: a single payload above `max_payload_bytes`.
//!
//! Either rule tripping yields an [`TelemetryVerdict::Anomaly`]; the
//! telemetry route then revokes the device through the same path as an
//! administrative revocation. Detection state is in-memory only and
//! resets on restart.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use ziot_core::DeviceId;

const WINDOW: Duration = Duration::from_secs(60);

/// Outcome of one telemetry observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryVerdict {
    Ok,
    /// The reason string is what the revocation records.
    Anomaly { reason: String },
}

/// Sliding-window per-device telemetry tracker.
#[derive(Clone)]
pub struct BehaviorGuard {
    max_events_per_minute: usize,
    max_payload_bytes: u64,
    history: Arc<DashMap<String, Vec<Instant>>>,
}

impl BehaviorGuard {
    pub fn new(max_events_per_minute: usize, max_payload_bytes: u64) -> Self {
        Self {
            max_events_per_minute,
            max_payload_bytes,
            history: Arc::new(DashMap::new()),
        }
    }

    /// Record one event and evaluate both rules.
    pub fn observe(&self, device_id: &DeviceId, payload_bytes: u64) -> TelemetryVerdict {
        self.observe_at(device_id, payload_bytes, Instant::now())
    }

    fn observe_at(&self, device_id: &DeviceId, payload_bytes: u64, now: Instant) -> TelemetryVerdict {
        let mut entry = self
            .history
            .entry(device_id.as_str().to_string())
            .or_default();
        entry.retain(|t| now.duration_since(*t) < WINDOW);
        entry.push(now);
        let frequency = entry.len();
        drop(entry);

        let flooding = frequency > self.max_events_per_minute;
        let payload_spike = payload_bytes > self.max_payload_bytes;

        tracing::debug!(
            device_id = %device_id,
            frequency,
            payload_bytes,
            "telemetry observed"
        );

        if flooding || payload_spike {
            TelemetryVerdict::Anomaly {
                reason: format!("Anomaly Detected: Freq={frequency}, Size={payload_bytes}"),
            }
        } else {
            TelemetryVerdict::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_id() -> DeviceId {
        DeviceId::new("dev1").unwrap()
    }

    #[test]
    fn normal_traffic_is_ok() {
        let guard = BehaviorGuard::new(10, 1000);
        for _ in 0..10 {
            assert_eq!(guard.observe(&device_id(), 100), TelemetryVerdict::Ok);
        }
    }

    #[test]
    fn eleventh_event_in_window_is_flooding() {
        let guard = BehaviorGuard::new(10, 1000);
        let now = Instant::now();
        for _ in 0..10 {
            assert_eq!(
                guard.observe_at(&device_id(), 100, now),
                TelemetryVerdict::Ok
            );
        }
        let verdict = guard.observe_at(&device_id(), 100, now);
        assert!(
            matches!(verdict, TelemetryVerdict::Anomaly { ref reason } if reason.contains("Freq=11")),
            "got {verdict:?}"
        );
    }

    #[test]
    fn events_outside_the_window_age_out() {
        let guard = BehaviorGuard::new(10, 1000);
        let start = Instant::now();
        for _ in 0..10 {
            guard.observe_at(&device_id(), 100, start);
        }
        // 61 seconds later the window is empty again.
        let later = start + Duration::from_secs(61);
        assert_eq!(
            guard.observe_at(&device_id(), 100, later),
            TelemetryVerdict::Ok
        );
    }

    #[test]
    fn oversized_payload_is_anomalous_on_first_event() {
        let guard = BehaviorGuard::new(10, 1000);
        let verdict = guard.observe(&device_id(), 1001);
        assert!(
            matches!(verdict, TelemetryVerdict::Anomaly { ref reason } if reason.contains("Size=1001")),
            "got {verdict:?}"
        );
    }

    #[test]
    fn payload_at_threshold_is_ok() {
        let guard = BehaviorGuard::new(10, 1000);
        assert_eq!(guard.observe(&device_id(), 1000), TelemetryVerdict::Ok);
    }

    #[test]
    fn devices_are_tracked_independently() {
        let guard = BehaviorGuard::new(1, 1000);
        let a = DeviceId::new("dev-a").unwrap();
        let b = DeviceId::new("dev-b").unwrap();
        assert_eq!(guard.observe(&a, 10), TelemetryVerdict::Ok);
        assert_eq!(guard.observe(&b, 10), TelemetryVerdict::Ok);
    }
}
