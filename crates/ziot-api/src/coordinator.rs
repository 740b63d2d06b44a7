//! # Authentication Coordinator
//!
//! The decision pipeline behind the device routes. Each operation takes
//! the per-device lock for its whole read-check-mutate span, so a verify
//! in flight can never observe a commitment a concurrent re-registration
//! is midway through replacing. Ledger notarization is fire-and-forget
//! and happens after the local decision is already made.
//!
//! ## Verify ordering
//!
//! Verification first requires the hashing subsystem to be initialized
//! (503 otherwise, like registration). The remaining checks run
//! strictly in this order and short-circuit:
//!
//! 1. device exists (404)
//! 2. status is `ACTIVE` (403)
//! 3. `publicSignals[0]` equals the stored commitment (401, verifier
//!    never runs)
//! 4. Groth16 check on a blocking worker under a deadline; a timeout
//!    counts as an invalid proof (401)
//!
//! Only a full pass stamps `last_seen` and issues a credential.

use chrono::Utc;

use ziot_core::{AuthAttempt, Commitment, DeviceId, DeviceRecord, DeviceStatus};
use ziot_zkp::Proof;

use crate::error::AppError;
use crate::state::AppState;

/// Reason strings recorded for authentication outcomes.
pub const REASON_OK: &str = "OK";
pub const REASON_COMMITMENT_MISMATCH: &str = "Commitment mismatch";
pub const REASON_INVALID_PROOF: &str = "Invalid ZK Proof";

/// Register a device, or re-register it with a fresh secret.
///
/// Returns the commitment now on file.
pub async fn handle_register(
    state: &AppState,
    device_id: &DeviceId,
    secret: &str,
) -> Result<Commitment, AppError> {
    let hasher = state.hasher.get()?;
    let normalized = ziot_crypto::normalize_secret(secret);
    let commitment = hasher.commitment(&normalized)?;

    let _guard = state.registry.guard(device_id).await;
    let record = state.registry.register(device_id, &commitment).await?;

    tracing::info!(
        device_id = %device_id,
        commitment = %record.commitment,
        "device registered"
    );
    state
        .notarizer
        .register_device(device_id, &record.commitment);

    Ok(record.commitment)
}

/// Verify a proof of secret knowledge and issue a session credential.
pub async fn handle_verify(
    state: &AppState,
    device_id: &DeviceId,
    proof: Proof,
    public_signals: Vec<String>,
) -> Result<String, AppError> {
    // Same readiness gate as registration: no auth decisions before the
    // hashing subsystem is up.
    state.hasher.get()?;

    let _guard = state.registry.guard(device_id).await;

    let record = state.registry.get(device_id).await?;
    if record.status != DeviceStatus::Active {
        tracing::info!(
            device_id = %device_id,
            status = %record.status,
            "verify refused: device not active"
        );
        return Err(AppError::NotActive {
            status: record.status,
        });
    }

    if public_signals.first().map(String::as_str) != Some(record.commitment.as_str()) {
        return Err(fail_auth(state, device_id, REASON_COMMITMENT_MISMATCH));
    }

    if !verify_bounded(state, proof, public_signals).await {
        return Err(fail_auth(state, device_id, REASON_INVALID_PROOF));
    }

    state.registry.mark_seen(device_id).await?;
    let now = Utc::now();
    tracing::info!(device_id = %device_id, "verify succeeded");
    state.notarizer.log_auth(&AuthAttempt {
        device_id: device_id.clone(),
        success: true,
        reason: REASON_OK.to_string(),
        timestamp: now,
    });

    let token = state.issuer.issue(device_id, now)?;
    Ok(token)
}

/// Revoke a device. Administrative revocation and the behavior guard
/// both land here.
pub async fn handle_revoke(
    state: &AppState,
    device_id: &DeviceId,
    reason: &str,
) -> Result<DeviceRecord, AppError> {
    tracing::warn!(device_id = %device_id, reason, "revocation triggered");

    let _guard = state.registry.guard(device_id).await;
    let record = state.registry.revoke(device_id).await?;
    state
        .notarizer
        .set_status(device_id, DeviceStatus::Revoked);
    Ok(record)
}

/// Log and notarize a failed attempt, returning the 401 to surface.
fn fail_auth(state: &AppState, device_id: &DeviceId, reason: &'static str) -> AppError {
    tracing::info!(device_id = %device_id, reason, "verify failed");
    state.notarizer.log_auth(&AuthAttempt {
        device_id: device_id.clone(),
        success: false,
        reason: reason.to_string(),
        timestamp: Utc::now(),
    });
    AppError::Unauthorized(reason.to_string())
}

/// Run the pairing check on a blocking worker under the configured
/// deadline. A timeout or a lost worker counts as an invalid proof.
async fn verify_bounded(state: &AppState, proof: Proof, public_signals: Vec<String>) -> bool {
    let verifier = state.verifier.clone();
    let task =
        tokio::task::spawn_blocking(move || verifier.verify(&proof, &public_signals));
    match tokio::time::timeout(state.config.verify_timeout, task).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::error!("proof verification worker failed: {e}");
            false
        }
        Err(_) => {
            tracing::warn!(
                timeout = ?state.config.verify_timeout,
                "proof verification timed out"
            );
            false
        }
    }
}
