//! Retry with exponential backoff for ledger HTTP calls.
//!
//! Retries only on transport errors (connection failures, timeouts).
//! HTTP error statuses are returned immediately: the request reached the
//! ledger, and replaying it would double-notarize the event.

use std::time::Duration;

/// Backoff schedule for one ledger operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    /// Retry attempts after the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 retries at 200ms, 400ms, 800ms.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Call `f` until it returns a response or the schedule is exhausted.
    ///
    /// Only [`reqwest::Error`] transport failures trigger a retry; the
    /// caller inspects the response status itself.
    pub(crate) async fn send<F, Fut>(
        &self,
        operation: &'static str,
        f: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut delay = self.base_delay;
        for attempt in 1..=self.max_retries {
            match f().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        "ledger request failed, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
        // Final attempt, errors propagate.
        f().await
    }
}
