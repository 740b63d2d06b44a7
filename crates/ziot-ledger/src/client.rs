//! # Ledger Notarization Clients
//!
//! [`LedgerNotarizer`] is the seam between the authority and whatever
//! ledger backs it. Two implementations ship:
//!
//! - [`HttpLedger`]: JSON over HTTP to a ledger gateway, with backoff on
//!   transport errors.
//! - [`NoopLedger`]: used when `LEDGER_URL` is unset; every call is a
//!   silent success.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use ziot_core::{Commitment, DeviceStatus};

use crate::error::LedgerError;
use crate::hash::IdHash;
use crate::retry::RetryPolicy;

/// External ledger contract.
///
/// All methods are best-effort: callers treat errors as log-and-drop,
/// never as authentication input.
#[async_trait]
pub trait LedgerNotarizer: Send + Sync {
    /// Record a device registration (or re-registration).
    async fn register_device(
        &self,
        id_hash: &IdHash,
        commitment: &Commitment,
    ) -> Result<(), LedgerError>;

    /// Record a lifecycle status change.
    async fn set_status(&self, id_hash: &IdHash, status: DeviceStatus) -> Result<(), LedgerError>;

    /// Record one authentication outcome.
    async fn log_auth(
        &self,
        id_hash: &IdHash,
        success: bool,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LedgerError>;
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    id_hash: &'a str,
    commitment: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    status: DeviceStatus,
}

#[derive(Serialize)]
struct AuthLogBody<'a> {
    id_hash: &'a str,
    success: bool,
    reason: &'a str,
    timestamp: DateTime<Utc>,
}

/// HTTP client for a ledger gateway exposing the notarization contract.
#[derive(Debug)]
pub struct HttpLedger {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl HttpLedger {
    /// Build a client for the gateway at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy: RetryPolicy::default(),
        })
    }

    async fn post<B: Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<(), LedgerError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .policy
            .send(operation, || self.client.post(&url).json(body).send())
            .await?;

        if !resp.status().is_success() {
            return Err(LedgerError::Rejected {
                operation,
                status: resp.status(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerNotarizer for HttpLedger {
    async fn register_device(
        &self,
        id_hash: &IdHash,
        commitment: &Commitment,
    ) -> Result<(), LedgerError> {
        self.post(
            "registerDevice",
            "/v1/devices",
            &RegisterBody {
                id_hash: id_hash.as_str(),
                commitment: commitment.as_str(),
            },
        )
        .await
    }

    async fn set_status(&self, id_hash: &IdHash, status: DeviceStatus) -> Result<(), LedgerError> {
        let path = format!("/v1/devices/{id_hash}/status");
        self.post("updateStatus", &path, &StatusBody { status }).await
    }

    async fn log_auth(
        &self,
        id_hash: &IdHash,
        success: bool,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        self.post(
            "logAuth",
            "/v1/auth-logs",
            &AuthLogBody {
                id_hash: id_hash.as_str(),
                success,
                reason,
                timestamp,
            },
        )
        .await
    }
}

/// Stand-in notarizer for deployments without a ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLedger;

#[async_trait]
impl LedgerNotarizer for NoopLedger {
    async fn register_device(
        &self,
        _id_hash: &IdHash,
        _commitment: &Commitment,
    ) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn set_status(
        &self,
        _id_hash: &IdHash,
        _status: DeviceStatus,
    ) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn log_auth(
        &self,
        _id_hash: &IdHash,
        _success: bool,
        _reason: &str,
        _timestamp: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        Ok(())
    }
}
