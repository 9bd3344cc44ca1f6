//! Retry with exponential back-off and jitter for the Modash client.
//!
//! Only transient failures are retried. Everything else, including a provider
//! answering "not found" or an `error` body, is returned on the first attempt
//! so the per-link budget is not spent on requests that cannot succeed.

use std::future::Future;
use std::time::Duration;

use crate::error::ModashError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`ModashError::RateLimited`]: HTTP 429.
/// - [`ModashError::Http`]: timeouts and connection failures.
/// - [`ModashError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:** not-found, provider errors, malformed bodies and
/// configuration errors.
pub(crate) fn is_retriable(err: &ModashError) -> bool {
    match err {
        ModashError::RateLimited { .. } => true,
        ModashError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        ModashError::UnexpectedStatus { status, .. } => *status >= 500,
        ModashError::NotFound { .. }
        | ModashError::Provider(_)
        | ModashError::Deserialize { .. }
        | ModashError::InvalidBaseUrl { .. }
        | ModashError::MissingApiKey => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds with
/// ±25 % jitter, capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ModashError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ModashError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1_000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Modash error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
