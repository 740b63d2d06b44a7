//! # Service Configuration
//!
//! All configuration comes from environment variables, read once at
//! bootstrap. Every knob has a default so a bare `ziot-api` starts in
//! development mode: in-memory registry, no ledger, artifacts in
//! `./artifacts`.

use std::path::PathBuf;
use std::time::Duration;

/// Environment-derived service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port (`ZIOT_PORT`, default 3001).
    pub port: u16,
    /// Ledger gateway base URL (`LEDGER_URL`); `None` disables notarization.
    pub ledger_url: Option<String>,
    /// Directory holding the Groth16 verifying key
    /// (`ZIOT_ARTIFACTS_DIR`, default `./artifacts`).
    pub artifacts_dir: PathBuf,
    /// Upper bound on one proof verification (`ZIOT_VERIFY_TIMEOUT_SECS`,
    /// default 5s). A verification that exceeds it counts as invalid.
    pub verify_timeout: Duration,
    /// Session credential lifetime in seconds (`ZIOT_TOKEN_TTL_SECS`,
    /// default 900).
    pub token_ttl_secs: i64,
    /// Telemetry payload size above which a device is revoked
    /// (`ZIOT_MAX_PAYLOAD_BYTES`, default 1000).
    pub max_payload_bytes: u64,
    /// Telemetry events per device per minute above which a device is
    /// revoked (`ZIOT_MAX_EVENTS_PER_MINUTE`, default 10).
    pub max_events_per_minute: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            ledger_url: None,
            artifacts_dir: PathBuf::from("./artifacts"),
            verify_timeout: Duration::from_secs(5),
            token_ttl_secs: 900,
            max_payload_bytes: 1000,
            max_events_per_minute: 10,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parsed("ZIOT_PORT").unwrap_or(defaults.port),
            ledger_url: std::env::var("LEDGER_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            artifacts_dir: std::env::var("ZIOT_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),
            verify_timeout: env_parsed("ZIOT_VERIFY_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.verify_timeout),
            token_ttl_secs: env_parsed("ZIOT_TOKEN_TTL_SECS").unwrap_or(defaults.token_ttl_secs),
            max_payload_bytes: env_parsed("ZIOT_MAX_PAYLOAD_BYTES")
                .unwrap_or(defaults.max_payload_bytes),
            max_events_per_minute: env_parsed("ZIOT_MAX_EVENTS_PER_MINUTE")
                .unwrap_or(defaults.max_events_per_minute),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "unparsable env var, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.verify_timeout, Duration::from_secs(5));
        assert_eq!(config.max_payload_bytes, 1000);
        assert_eq!(config.max_events_per_minute, 10);
        assert!(config.ledger_url.is_none());
    }
}
