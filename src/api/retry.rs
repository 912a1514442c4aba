//! Retry Logic and Error Resilience
//!
//! Bounded retry with exponential backoff for transient catalog failures.
//!
//! # Policy
//!
//! - **Transient**: HTTP 429, HTTP 5xx, connection and timeout failures
//! - **Permanent**: any other 4xx, malformed requests
//! - **Attempts**: 3 in total by default, strictly sequential
//! - **Backoff**: `base_delay * 2^attempt`, capped at `max_delay`, optional jitter
//! - **Admission**: every attempt takes its own rate limiter permit
//!
//! # Example
//!
//! ```ignore
//! let config = RetryConfig::default()
//!     .max_attempts(3)
//!     .base_delay(Duration::from_millis(500));
//!
//! let outcome = retry_with_backoff(&config, &limiter, |_attempt| transport.get(&request)).await;
//! ```

use super::transport::{TransportError, TransportResult};
use crate::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt)
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Jitter factor (0.0 to 1.0) added on top of the computed delay
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            jitter: 0.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of attempts (at least one)
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the delay before the first retry
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the maximum delay between retries
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the jitter factor
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Backoff before retry number `attempt + 1` (zero-indexed)
    ///
    /// `base_delay * 2^attempt`, capped at `max_delay`. Pure; no jitter.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt);
        let delay_ms = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    /// Upper bound on the time spent sleeping across all retries
    pub fn total_backoff(&self) -> Duration {
        let cap = Duration::from_millis(self.max_delay_ms);
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| {
                let delay = self.calculate_delay(attempt);
                delay.saturating_add(delay.mul_f64(self.jitter.clamp(0.0, 1.0))).min(cap)
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// [`calculate_delay`](Self::calculate_delay) plus random jitter
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.calculate_delay(attempt);
        if self.jitter <= 0.0 {
            return delay;
        }
        let extra = delay.mul_f64(self.jitter * rand::random::<f64>());
        delay
            .saturating_add(extra)
            .min(Duration::from_millis(self.max_delay_ms))
    }
}

/// Check if an HTTP status code should be retried
///
/// 429 Too Many Requests and every 5xx are retried; nothing else is.
pub fn should_retry_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Check if a transport outcome is a transient failure
pub fn is_transient(outcome: &TransportResult) -> bool {
    match outcome {
        Ok(response) => !response.is_success() && should_retry_status(response.status),
        Err(err) => err.is_transient(),
    }
}

/// Final outcome of a retried exchange
#[derive(Debug)]
pub struct RetryOutcome {
    /// Last attempt's result (success or final failure)
    pub result: TransportResult,

    /// Number of attempts made
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails permanently or attempts run out
///
/// Each attempt first acquires a permit from `limiter`. Attempts are
/// sequential; dropping the returned future stops further attempts.
pub async fn retry_with_backoff<F, Fut>(
    config: &RetryConfig,
    limiter: &RateLimiter,
    operation: F,
) -> RetryOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = TransportResult>,
{
    retry_within_budget(config, limiter, None, operation).await
}

/// [`retry_with_backoff`] with the time spent in attempts and backoff sleeps
/// capped at `budget`
///
/// Waiting for a rate limiter permit is not charged against the budget, so a
/// call queued behind others never times out before it reaches the network.
/// Running out of budget ends the call with [`TransportError::Timeout`].
pub async fn retry_within_budget<F, Fut>(
    config: &RetryConfig,
    limiter: &RateLimiter,
    budget: Option<Duration>,
    mut operation: F,
) -> RetryOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = TransportResult>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    let mut spent = Duration::ZERO;

    loop {
        let permit = limiter.acquire().await;
        if !permit.waited().is_zero() {
            tracing::debug!(
                attempt = attempt + 1,
                waited_ms = permit.waited().as_millis() as u64,
                "admitted by rate limiter"
            );
        }

        let started = Instant::now();
        let result = match budget {
            Some(budget) => match timeout(budget.saturating_sub(spent), operation(attempt)).await {
                Ok(result) => result,
                Err(_) => return exhausted(budget, attempt + 1),
            },
            None => operation(attempt).await,
        };
        spent += started.elapsed();
        attempt += 1;

        if !is_transient(&result) || attempt >= max_attempts {
            if attempt > 1 && matches!(&result, Ok(r) if r.is_success()) {
                tracing::info!(
                    "Operation succeeded on attempt {} after {} retries",
                    attempt,
                    attempt - 1
                );
            }
            return RetryOutcome {
                result,
                attempts: attempt,
            };
        }

        let delay = config.jittered_delay(attempt - 1);
        if let Some(budget) = budget {
            if spent + delay > budget {
                return exhausted(budget, attempt);
            }
        }

        tracing::warn!(
            attempt,
            failure = %describe(&result),
            delay_ms = delay.as_millis() as u64,
            "transient failure, retrying"
        );
        sleep(delay).await;
        spent += delay;
    }
}

fn exhausted(budget: Duration, attempts: u32) -> RetryOutcome {
    tracing::warn!(
        attempts,
        budget_ms = budget.as_millis() as u64,
        "retry budget exhausted"
    );
    RetryOutcome {
        result: Err(TransportError::Timeout(budget)),
        attempts,
    }
}

fn describe(outcome: &TransportResult) -> String {
    match outcome {
        Ok(response) => format!("HTTP {}", response.status),
        Err(err) => err.to_string(),
    }
}
