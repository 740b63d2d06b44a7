//! # Request Extraction Helpers
//!
//! JSON body extraction that folds axum's deserialization rejection and
//! the DTO's own validation into [`AppError::Validation`], so handlers
//! deal with exactly one failure path.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request-level validation, run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejection and validation failure to 422.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dummy {
        ok: bool,
    }

    impl Validate for Dummy {
        fn validate(&self) -> Result<(), String> {
            if self.ok {
                Ok(())
            } else {
                Err("not ok".to_string())
            }
        }
    }

    #[test]
    fn valid_body_passes_through() {
        let out = extract_validated_json(Ok(Json(Dummy { ok: true })));
        assert!(out.is_ok());
    }

    #[test]
    fn failed_validation_is_422() {
        let err = extract_validated_json(Ok(Json(Dummy { ok: false }))).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "not ok"));
    }
}
