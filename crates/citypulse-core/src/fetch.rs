//! Endpoint retrieval with retry.
//!
//! The fetch is the only asynchronous step of a run. It completes, or fails
//! for good, before ingestion starts.

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::retry::RetryConfig;

/// Request and retry settings for one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retry: RetryConfig::default(),
        }
    }
}

impl FetchConfig {
    pub fn request(&self, endpoint: &str) -> HttpRequest {
        HttpRequest::get(endpoint)
            .with_header("accept", "application/x-ndjson, application/json;q=0.9, */*;q=0.1")
            .with_timeout_ms(self.timeout_ms)
    }
}

/// Retrieves the raw body of `endpoint`, undecoded.
///
/// Transport errors marked retryable and responses with a 4xx/5xx status
/// count as failed attempts. The configured backoff is slept between
/// attempts but not after the last one. A non-retryable transport error
/// stops immediately.
pub async fn fetch_body(
    client: &dyn HttpClient,
    endpoint: &str,
    config: &FetchConfig,
) -> Result<Vec<u8>, FetchError> {
    let attempts = config.retry.attempts();
    let mut failed = 0;

    loop {
        debug!(endpoint, attempt = failed + 1, "requesting endpoint");
        let error = match client.execute(config.request(endpoint)).await {
            Ok(response) if response.is_success() => {
                info!(
                    endpoint,
                    status = response.status,
                    bytes = response.body.len(),
                    "fetched endpoint"
                );
                return Ok(response.body);
            }
            Ok(response) => HttpError::status(response.status),
            Err(error) if !error.retryable() => {
                warn!(endpoint, %error, "request cannot be retried");
                return Err(FetchError::Rejected(error));
            }
            Err(error) => error,
        };

        failed += 1;
        warn!(endpoint, attempt = failed, max_attempts = attempts, %error, "fetch attempt failed");
        if failed >= attempts {
            return Err(FetchError::Exhausted {
                attempts,
                last: error,
            });
        }

        tokio::time::sleep(config.retry.delay_for_attempt(failed - 1)).await;
    }
}
