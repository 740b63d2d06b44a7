//! Ledger client error type.
//!
//! These errors never cross the API boundary; the notarizer logs them
//! and drops them.

use thiserror::Error;

/// Failure to notarize one event on the external ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport-level failure after retries were exhausted.
    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The ledger answered with a non-success status.
    #[error("ledger rejected {operation}: HTTP {status}")]
    Rejected {
        operation: &'static str,
        status: reqwest::StatusCode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_operation_and_status() {
        let err = LedgerError::Rejected {
            operation: "registerDevice",
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        let msg = err.to_string();
        assert!(msg.contains("registerDevice"));
        assert!(msg.contains("502"));
    }
}
