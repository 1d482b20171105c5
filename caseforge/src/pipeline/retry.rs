//! Explicit retry strategy for outbound provider calls.
//!
//! Only connection-level transport failures go through the policy: callers
//! treat an HTTP response (of any status) as `Ok`, so upstream error statuses,
//! protocol violations, and validation errors are never retried. The default
//! policy performs a single attempt, which disables retries entirely.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

/// Bounded exponential backoff over connection-level failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt - no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            // max_attempts is validated >= 1 at config load; clamp anyway
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay,
            max_delay: config.max_delay,
        }
    }

    /// Delay before the given retry (attempt is 1-based; attempt 1 is the
    /// initial call and has no delay). Capped at `max_delay` so large
    /// attempt counts don't produce unbounded sleeps.
    fn backoff(&self, attempt: u32) -> Duration {
        (self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))).min(self.max_delay)
    }

    /// Run `op` until it succeeds or attempts are exhausted, sleeping with
    /// exponential backoff between attempts. The final error is returned
    /// as-is.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Transport error, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
