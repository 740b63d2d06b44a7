//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from ziot-core, ziot-crypto, and ziot-registry to
//! HTTP status codes with a consistent JSON body. Internal error details
//! are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use ziot_core::DeviceStatus;

/// Structured JSON error response body.
///
/// All error responses use this format across the API surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown device (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed, including JSON deserialization
    /// failures: the client sent syntactically valid HTTP but
    /// semantically invalid content (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Proof rejected — commitment mismatch or invalid proof (401).
    /// The message is one of the protocol's fixed reason strings.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Device exists but its status forbids authentication (403).
    #[error("device is {status}")]
    NotActive { status: DeviceStatus },

    /// Commitment hashing is still warming up (503, retryable).
    #[error("not ready: {0}")]
    NotReady(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotActive { .. } => (StatusCode::FORBIDDEN, "DEVICE_NOT_ACTIVE"),
            Self::NotReady(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::NotReady(_) => tracing::warn!(error = %self, "service not ready"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ziot_core::ValidationError> for AppError {
    fn from(err: ziot_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ziot_crypto::CryptoError> for AppError {
    fn from(err: ziot_crypto::CryptoError) -> Self {
        match err {
            ziot_crypto::CryptoError::NotInitialized => {
                Self::NotReady("commitment hashing is initializing, retry shortly".to_string())
            }
            ziot_crypto::CryptoError::InvalidFieldElement(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ziot_registry::RegistryError> for AppError {
    fn from(err: ziot_registry::RegistryError) -> Self {
        match err {
            ziot_registry::RegistryError::NotFound(id) => {
                Self::NotFound(format!("device {id} not found"))
            }
            ziot_registry::RegistryError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("device dev1 not found".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("deviceId must not be empty".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn unauthorized_status_code() {
        let err = AppError::Unauthorized("Invalid ZK Proof".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn not_active_status_code_and_message() {
        let err = AppError::NotActive {
            status: DeviceStatus::Revoked,
        };
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "DEVICE_NOT_ACTIVE");
        assert_eq!(err.to_string(), "device is REVOKED");
    }

    #[test]
    fn not_ready_status_code() {
        let err = AppError::NotReady("warming up".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "NOT_READY");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("db connection failed".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn registry_not_found_maps_to_404() {
        let id = ziot_core::DeviceId::new("dev1").unwrap();
        let err = AppError::from(ziot_registry::RegistryError::NotFound(id));
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn crypto_not_initialized_maps_to_503() {
        let err = AppError::from(ziot_crypto::CryptoError::NotInitialized);
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "NOT_READY");
    }

    #[test]
    fn error_body_serializes_without_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(!json.contains("details"));
    }

    // -- into_response tests --

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("device dev9 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("dev9"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(
            !body.error.message.contains("db connection"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn into_response_forbidden_carries_status() {
        let (status, body) = response_parts(AppError::NotActive {
            status: DeviceStatus::Revoked,
        })
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error.code, "DEVICE_NOT_ACTIVE");
        assert!(body.error.message.contains("REVOKED"));
    }
}
