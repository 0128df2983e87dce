//! Retry with exponential backoff for API calls
//!
//! Runs a fallible async operation up to a fixed number of attempts, sleeping
//! between attempts. The delay doubles after every failure when backoff is
//! enabled. No sleep happens after the final attempt, and the last error is
//! returned unchanged.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub delay: Duration,

    /// Double the delay after each failed attempt
    pub backoff: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
            backoff: true,
        }
    }
}

impl RetryConfig {
    /// Policy used when persisting drag-and-drop reorders
    pub fn drag() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
            backoff: true,
        }
    }

    /// Delay to sleep after the given failed attempt (1-based)
    ///
    /// `delay * 2^(attempt-1)` with backoff, `delay` without.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if !self.backoff {
            return self.delay;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.delay.saturating_mul(factor)
    }
}

/// Errors that can tell whether a retry may help
pub trait RetryableError {
    /// Network failures, timeouts and 5xx responses
    fn is_transient(&self) -> bool;
}

/// Execute an async operation, retrying every failure
///
/// # Arguments
/// * `config` - Retry configuration
/// * `operation_name` - Name for logging purposes
/// * `operation` - The async operation to execute
///
/// # Returns
/// The result of the operation, or the last error if all attempts failed
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    run(config, operation_name, operation, |_| true).await
}

/// Execute an async operation, retrying only transient failures
///
/// Non-transient errors are returned immediately without consuming the
/// remaining attempts.
pub async fn with_transient_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    run(config, operation_name, operation, |e: &E| e.is_transient()).await
}

async fn run<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !should_retry(&e) {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        "Operation failed with non-retryable error: {}",
                        e
                    );
                    return Err(e);
                }

                if attempt >= max_attempts {
                    warn!(
                        operation = operation_name,
                        attempts = attempt,
                        "Operation failed after {} attempts: {}",
                        attempt,
                        e
                    );
                    return Err(e);
                }

                let delay = config.delay_after(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after error: {}",
                    e
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
