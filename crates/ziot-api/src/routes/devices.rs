//! # Device Lifecycle & Authentication API
//!
//! Wire DTOs use camelCase field names; the proof payload is the
//! `{a, b, c}` + `publicSignals` bundle the device tooling produces.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroize;

use ziot_core::{DeviceId, DeviceRecord, DeviceStatus};
use ziot_zkp::Proof;

use crate::coordinator;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to register a device with a fresh secret.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub device_id: String,
    pub secret: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("secret must not be empty".to_string());
        }
        Ok(())
    }
}

/// Registration outcome: the commitment now on file.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub commitment: String,
}

/// Request to authenticate with a zero-knowledge proof.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub device_id: String,
    /// Groth16 proof points as decimal coordinate strings.
    #[schema(value_type = Object)]
    pub proof: Proof,
    /// Ordered public signals; `publicSignals[0]` must be the commitment.
    pub public_signals: Vec<String>,
}

impl Validate for VerifyRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Successful authentication: a signed session credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub success: bool,
    pub token: String,
}

/// Request to revoke a device.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    pub device_id: String,
    /// Recorded with the revocation; defaults to an administrative reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl Validate for RevokeRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Revocation outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevokeResponse {
    pub success: bool,
    pub status: DeviceStatus,
}

/// Build the device router.
pub fn router() -> Router<AppState> {
    let router = Router::new()
        .route("/v1/devices/register", post(register_device))
        .route("/v1/devices/verify", post(verify_device))
        .route("/v1/devices/revoke", post(revoke_device))
        .route("/v1/devices/:device_id", get(get_device));
    #[cfg(feature = "dev-prover")]
    let router = router.route("/v1/devices/prove", post(dev_prover::prove_for_secret));
    router
}

/// POST /v1/devices/register — register or re-register a device.
#[utoipa::path(
    post,
    path = "/v1/devices/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Device registered", body = RegisterResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorBody),
        (status = 503, description = "Hashing warming up", body = crate::error::ErrorBody),
    ),
    tag = "devices"
)]
pub(crate) async fn register_device(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut req = extract_validated_json(body)?;
    let device_id = DeviceId::new(&req.device_id)?;

    let result = coordinator::handle_register(&state, &device_id, &req.secret).await;
    req.secret.zeroize();
    let commitment = result?;

    Ok(Json(RegisterResponse {
        success: true,
        commitment: commitment.as_str().to_string(),
    }))
}

/// POST /v1/devices/verify — authenticate with a proof.
#[utoipa::path(
    post,
    path = "/v1/devices/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Proof accepted, credential issued", body = VerifyResponse),
        (status = 401, description = "Proof rejected", body = crate::error::ErrorBody),
        (status = 403, description = "Device not active", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown device", body = crate::error::ErrorBody),
    ),
    tag = "devices"
)]
pub(crate) async fn verify_device(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let device_id = DeviceId::new(&req.device_id)?;

    let token =
        coordinator::handle_verify(&state, &device_id, req.proof, req.public_signals).await?;
    Ok(Json(VerifyResponse {
        success: true,
        token,
    }))
}

/// POST /v1/devices/revoke — revoke a device (idempotent).
#[utoipa::path(
    post,
    path = "/v1/devices/revoke",
    request_body = RevokeRequest,
    responses(
        (status = 200, description = "Device revoked", body = RevokeResponse),
        (status = 404, description = "Unknown device", body = crate::error::ErrorBody),
    ),
    tag = "devices"
)]
pub(crate) async fn revoke_device(
    State(state): State<AppState>,
    body: Result<Json<RevokeRequest>, JsonRejection>,
) -> Result<Json<RevokeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let device_id = DeviceId::new(&req.device_id)?;
    let reason = req.reason.as_deref().unwrap_or("Administrative revocation");

    let record = coordinator::handle_revoke(&state, &device_id, reason).await?;
    Ok(Json(RevokeResponse {
        success: true,
        status: record.status,
    }))
}

/// GET /v1/devices/:device_id — device record lookup.
#[utoipa::path(
    get,
    path = "/v1/devices/{device_id}",
    params(("device_id" = String, Path, description = "Device identifier")),
    responses(
        (status = 200, description = "Device found", body = DeviceRecord),
        (status = 404, description = "Unknown device", body = crate::error::ErrorBody),
    ),
    tag = "devices"
)]
pub(crate) async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceRecord>, AppError> {
    let device_id = DeviceId::new(&device_id)?;
    let record = state.registry.get(&device_id).await?;
    Ok(Json(record))
}

#[cfg(feature = "dev-prover")]
pub mod dev_prover {
    //! Server-side proof generation. A proving oracle undermines the
    //! protocol in production, so this route exists only behind the
    //! `dev-prover` feature.

    use super::*;

    /// Request to generate a proof for a supplied secret.
    #[derive(Debug, Deserialize, ToSchema)]
    pub struct ProveRequest {
        pub secret: String,
    }

    impl Validate for ProveRequest {
        fn validate(&self) -> Result<(), String> {
            if self.secret.is_empty() {
                return Err("secret must not be empty".to_string());
            }
            Ok(())
        }
    }

    /// POST /v1/devices/prove — generate a proof bundle for a secret.
    #[utoipa::path(
        post,
        path = "/v1/devices/prove",
        request_body = ProveRequest,
        responses(
            (status = 200, description = "Proof bundle"),
            (status = 503, description = "Proving key not loaded", body = crate::error::ErrorBody),
        ),
        tag = "devices"
    )]
    pub async fn prove_for_secret(
        State(state): State<AppState>,
        body: Result<Json<ProveRequest>, JsonRejection>,
    ) -> Result<Json<ziot_zkp::ProofBundle>, AppError> {
        let req = extract_validated_json(body)?;
        let hasher = state.hasher.get()?;
        let proving_key = state
            .proving_key
            .clone()
            .ok_or_else(|| AppError::NotReady("proving key not loaded".to_string()))?;

        // Proving is seconds of CPU; keep it off the async workers.
        let bundle = tokio::task::spawn_blocking(move || {
            let mut secret = req.secret;
            let mut rng = rand_core::OsRng;
            let out = ziot_zkp::prove(&hasher, &proving_key, &secret, &mut rng);
            secret.zeroize();
            out
        })
        .await
        .map_err(|e| AppError::Internal(format!("proving worker failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("proof generation failed: {e}")))?;

        Ok(Json(bundle))
    }
}
