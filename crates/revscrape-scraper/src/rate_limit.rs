//! Retry utilities for page fetchers.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses or 5xx gateway failures. Non-retriable errors
//! (404s, malformed responses) are propagated immediately without retrying.
//!
//! This is the per-request retry layer. The orchestrator never retries the
//! same page; it moves on to the next page number after a fetch fails.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RateLimited`] — HTTP 429; the server has asked us to back off.
/// - [`ScraperError::Http`] — network-level failure (connection reset, timeout, etc.).
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status — origin or proxy hiccup.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
/// Non-retriable errors are returned immediately.
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Cap the shift so extreme configs saturate instead of overflowing.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient fetch error; retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
