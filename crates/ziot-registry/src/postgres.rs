//! # Postgres Device Store
//!
//! SQLx-backed implementation of [`DeviceStore`]. The database layer is
//! optional: [`init_pool`] returns `None` when `DATABASE_URL` is unset,
//! and the caller falls back to [`MemoryStore`].
//!
//! The upsert uses `ON CONFLICT` so first registration and
//! re-registration are one statement; re-registration rewrites the
//! commitment and status while leaving `registered_at` and `last_seen`
//! untouched.
//!
//! [`MemoryStore`]: crate::store::MemoryStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use ziot_core::{Commitment, DeviceId, DeviceRecord, DeviceStatus};

use crate::error::StoreError;
use crate::store::DeviceStore;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Device records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Postgres-backed [`DeviceStore`] over the `devices` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for PgStore {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<DeviceRecord>, StoreError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "SELECT device_id, commitment, status, registered_at, updated_at, last_seen
             FROM devices WHERE device_id = $1",
        )
        .bind(device_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_record).transpose()
    }

    async fn upsert(
        &self,
        device_id: &DeviceId,
        commitment: &Commitment,
        now: DateTime<Utc>,
    ) -> Result<DeviceRecord, StoreError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "INSERT INTO devices (device_id, commitment, status, registered_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             ON CONFLICT (device_id) DO UPDATE
             SET commitment = EXCLUDED.commitment,
                 status = EXCLUDED.status,
                 updated_at = EXCLUDED.updated_at
             RETURNING device_id, commitment, status, registered_at, updated_at, last_seen",
        )
        .bind(device_id.as_str())
        .bind(commitment.as_str())
        .bind(DeviceStatus::Active.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row.into_record()
    }

    async fn set_status(
        &self,
        device_id: &DeviceId,
        status: DeviceStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE devices SET status = $1, updated_at = $2 WHERE device_id = $3")
                .bind(status.as_str())
                .bind(now)
                .bind(device_id.as_str())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_seen(
        &self,
        device_id: &DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE devices SET last_seen = $1, updated_at = $1 WHERE device_id = $2")
                .bind(now)
                .bind(device_id.as_str())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DeviceRow {
    device_id: String,
    commitment: String,
    status: String,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
}

impl DeviceRow {
    fn into_record(self) -> Result<DeviceRecord, StoreError> {
        let device_id = DeviceId::new(&self.device_id)
            .map_err(|e| StoreError::Corrupt(format!("device_id {:?}: {e}", self.device_id)))?;
        let commitment = Commitment::new(&self.commitment)
            .map_err(|e| StoreError::Corrupt(format!("commitment for {device_id}: {e}")))?;
        let status = DeviceStatus::parse(&self.status)
            .map_err(|e| StoreError::Corrupt(format!("status for {device_id}: {e}")))?;
        Ok(DeviceRecord {
            device_id,
            commitment,
            status,
            registered_at: self.registered_at,
            updated_at: self.updated_at,
            last_seen: self.last_seen,
        })
    }
}
