//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`. The `dev-prover` helper route is dev-only
//! and deliberately absent from the published spec.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the authority's API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ZIoT Identity Authority API",
        version = "0.3.2",
        description = "Zero-knowledge device identity authority.\n\nDevices register a Poseidon commitment to a secret and later authenticate by presenting a Groth16 proof of knowledge of that secret; the secret itself never crosses the wire. Successful authentication issues a signed, time-bound session credential. A behavior guard revokes devices whose telemetry turns anomalous.\n\nAll endpoints are unauthenticated: registration is open enrollment and verification is itself the authentication mechanism.",
        license(name = "Apache-2.0"),
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server"),
    ),
    paths(
        crate::routes::devices::register_device,
        crate::routes::devices::verify_device,
        crate::routes::devices::revoke_device,
        crate::routes::devices::get_device,
        crate::routes::telemetry::receive_telemetry,
    ),
    components(schemas(
        crate::routes::devices::RegisterRequest,
        crate::routes::devices::RegisterResponse,
        crate::routes::devices::VerifyRequest,
        crate::routes::devices::VerifyResponse,
        crate::routes::devices::RevokeRequest,
        crate::routes::devices::RevokeResponse,
        crate::routes::telemetry::TelemetryRequest,
        crate::routes::telemetry::TelemetryResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        ziot_core::DeviceRecord,
        ziot_core::DeviceStatus,
    )),
    tags(
        (name = "devices", description = "Device lifecycle and proof-gated authentication"),
        (name = "telemetry", description = "Behavior-guard telemetry ingestion"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
