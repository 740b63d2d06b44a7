//! # Behavior-Guard Telemetry API
//!
//! Devices (or the gateway in front of them) report telemetry here.
//! Anomalous behavior revokes the device through the same coordinator
//! path as an administrative revocation; the telemetry response itself
//! only says whether an anomaly was detected.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ziot_core::DeviceId;

use crate::behavior::TelemetryVerdict;
use crate::coordinator;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// One telemetry event from a device.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRequest {
    pub device_id: String,
    pub payload_size: u64,
    /// Reported sensor reading; required on the wire but not currently
    /// a rule input.
    pub metric_value: f64,
}

impl Validate for TelemetryRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Telemetry verdict.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TelemetryResponse {
    /// `"OK"` or `"ANOMALY_DETECTED"`.
    pub status: String,
}

/// Build the telemetry router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/telemetry", post(receive_telemetry))
}

/// POST /v1/telemetry — ingest one telemetry event.
#[utoipa::path(
    post,
    path = "/v1/telemetry",
    request_body = TelemetryRequest,
    responses(
        (status = 200, description = "Verdict", body = TelemetryResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorBody),
    ),
    tag = "telemetry"
)]
pub(crate) async fn receive_telemetry(
    State(state): State<AppState>,
    body: Result<Json<TelemetryRequest>, JsonRejection>,
) -> Result<Json<TelemetryResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let device_id = DeviceId::new(&req.device_id)?;

    match state.behavior.observe(&device_id, req.payload_size) {
        TelemetryVerdict::Ok => Ok(Json(TelemetryResponse {
            status: "OK".to_string(),
        })),
        TelemetryVerdict::Anomaly { reason } => {
            // Revocation of an unknown device is reported but does not
            // change the verdict: the anomaly stands either way.
            if let Err(e) = coordinator::handle_revoke(&state, &device_id, &reason).await {
                tracing::warn!(device_id = %device_id, "anomaly revocation failed: {e}");
            }
            Ok(Json(TelemetryResponse {
                status: "ANOMALY_DETECTED".to_string(),
            }))
        }
    }
}
