//! Retry and pacing utilities.
//!
//! Submission failures against the backend come in two flavors: transient
//! (network drop, 429, 5xx) and definitive (4xx, bad payload). Transient
//! ones are retried with exponential backoff; definitive ones are
//! propagated immediately. [`Pacer`] enforces the configured minimum
//! interval between product extractions so the source site is never
//! hammered.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CrawlError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable: network-level failures and 429/5xx submission rejections.
/// Everything else (extraction errors, navigation timeouts handled at the
/// crawl layer, 4xx rejections) is propagated immediately.
fn is_retriable(err: &CrawlError) -> bool {
    match err {
        CrawlError::Http(_) => true,
        CrawlError::Submission { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for
/// `backoff_base_secs * 2^attempt` seconds and tries again, up to
/// `max_retries` additional attempts after the first try. The last error is
/// returned once retries are exhausted; non-retriable errors return
/// immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CrawlError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        // Exponential backoff: base * 2^attempt seconds, capped against overflow.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient submission error; retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

/// Fixed-interval limiter between crawled products.
///
/// `pace()` sleeps just long enough that consecutive completions are at
/// least `interval` apart; the first call never sleeps. An interval of zero
/// disables pacing entirely.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub async fn pace(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
