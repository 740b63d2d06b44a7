//! # ziot-api — Axum API Service for the Identity Authority
//!
//! HTTP surface over the commitment scheme, proof verifier, device
//! registry, ledger notarizer, and behavior guard.
//!
//! ## API Surface
//!
//! | Route                        | Module                  | Behavior                         |
//! |------------------------------|-------------------------|----------------------------------|
//! | `POST /v1/devices/register`  | [`routes::devices`]     | Commit a secret, upsert record   |
//! | `POST /v1/devices/verify`    | [`routes::devices`]     | Proof-gated authentication       |
//! | `POST /v1/devices/revoke`    | [`routes::devices`]     | Idempotent revocation            |
//! | `GET /v1/devices/:device_id` | [`routes::devices`]     | Record lookup                    |
//! | `POST /v1/devices/prove`     | [`routes::devices`]     | Dev-only proving helper (feature)|
//! | `POST /v1/telemetry`         | [`routes::telemetry`]   | Behavior-guard ingestion         |
//! | `GET /openapi.json`          | [`openapi`]             | OpenAPI spec                     |
//!
//! Health probes (`/health`, `/health/liveness`, `/health/readiness`)
//! and `/metrics` are mounted separately and always unauthenticated.
//!
//! ## Readiness
//!
//! Poseidon parameter generation runs on a background worker at startup.
//! Until it installs into the [`HasherHandle`], readiness reports 503
//! and both registration and verification answer a retryable
//! `NOT_READY`.
//!
//! [`HasherHandle`]: ziot_crypto::HasherHandle

pub mod behavior;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `ZIOT_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything
/// other than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("ZIOT_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Body size limit: 2 MiB. Proof bundles are a few KiB; anything
    // larger is abuse.
    let mut api = Router::new()
        .merge(routes::devices::router())
        .merge(routes::telemetry::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Unauthenticated health probes; readiness checks actual service health.
    let mut unauthenticated = Router::new()
        .route("/health", axum::routing::get(health))
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        unauthenticated = unauthenticated
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics
        .hasher_ready()
        .set(if state.hasher.is_ready() { 1.0 } else { 0.0 });

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// GET /health — legacy health route kept for fielded device firmware.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the service can make auth decisions.
///
/// Checks:
/// - Poseidon hashing is initialized (registration depends on it).
/// - Database connection is healthy (when configured).
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if !state.hasher.is_ready() {
        return (StatusCode::SERVICE_UNAVAILABLE, "hasher warming up").into_response();
    }

    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
