//! Shared HTTP plumbing for the provider clients

use reqwest::{RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::LlmError;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Upper bound on a single backoff delay
const MAX_BACKOFF_MS: u64 = 60_000;

/// Exponential backoff before retry `attempt` (1-based), capped
fn backoff_ms(attempt: u32) -> u64 {
    INITIAL_BACKOFF_MS
        .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
        .min(MAX_BACKOFF_MS)
}

/// Send a request, retrying transient failures up to `max_retries` times
///
/// `build` is called once per attempt since a `RequestBuilder` is consumed
/// on send. A non-success status that is not retried (or has run out of
/// retries) becomes an `LlmError`.
pub(crate) async fn send_with_retry<F>(label: &str, max_retries: u32, build: F) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    debug!(%label, %max_retries, "send_with_retry: called");
    let mut last_error = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(attempt);
            warn!(
                %label,
                attempt,
                backoff_ms = backoff,
                "send_with_retry: retrying after transient error"
            );
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(attempt, error = %e, "send_with_retry: network error");
                let error = LlmError::Network(e);
                if !error.is_retryable() {
                    return Err(error);
                }
                last_error = Some(error);
                continue;
            }
        };

        let status = response.status().as_u16();

        if response.status().is_success() {
            debug!(%status, "send_with_retry: success");
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let message = response.text().await.unwrap_or_default();

        let error = if status == 429 {
            debug!("send_with_retry: rate limited (429)");
            LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after.unwrap_or(60)),
            }
        } else {
            debug!(%status, "send_with_retry: API error");
            LlmError::ApiError { status, message }
        };

        if !error.is_retryable() {
            return Err(error);
        }
        last_error = Some(error);
    }

    Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
}

/// Build the shared reqwest client with the configured timeout
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(LlmError::Network)
}
