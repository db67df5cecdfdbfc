//! Retry policy with exponential backoff for platform API calls.
//!
//! # Retryable failures
//!
//! | Retryable | Non-Retryable |
//! |-----------|---------------|
//! | HTTP 429 (Rate Limited) | HTTP 400 (Bad Request) |
//! | HTTP 500/502/503/504 | HTTP 401/403 (Auth Errors) |
//! | HTTP 408, network timeouts | HTTP 404 (Not Found) |
//! | Connection reset | HTTP 422 (Validation Error) |
//!
//! Every retry goes back through the rate limiter, so retries never bypass
//! local admission control.

use std::time::Duration;

use rand::Rng;

/// Retry tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Exponential growth factor.
    pub multiplier: f64,
    /// Jitter factor (0.2 = ±20%).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Calculator for exponential backoff with jitter.
#[derive(Debug)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Backoff {
    /// Start a fresh backoff sequence.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Delay before the next retry, or `None` once retries are exhausted.
    ///
    /// `retry_after` (e.g. from a `Retry-After` header) overrides the computed
    /// delay, still capped at `max_delay`.
    pub fn next_delay(&mut self, retry_after: Option<Duration>) -> Option<Duration> {
        if self.attempt >= self.policy.max_retries {
            return None;
        }

        let delay = retry_after.unwrap_or_else(|| self.apply_jitter(self.base_delay()));
        self.attempt += 1;

        Some(delay.min(self.policy.max_delay))
    }

    /// Retries taken so far.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.attempt
    }

    fn base_delay(&self) -> Duration {
        let exponent = i32::try_from(self.attempt).unwrap_or(i32::MAX);
        let factor = self.policy.multiplier.powi(exponent);
        let delay = self.policy.initial_delay.as_secs_f64() * factor;
        if delay.is_finite() {
            Duration::from_secs_f64(delay.min(self.policy.max_delay.as_secs_f64()))
        } else {
            self.policy.max_delay
        }
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.policy.jitter_factor <= 0.0 || delay.is_zero() {
            return delay;
        }
        let base = delay.as_secs_f64();
        let range = base * self.policy.jitter_factor;
        let jittered = rand::rng().random_range((base - range).max(0.0)..=base + range);
        Duration::from_secs_f64(jittered)
    }
}

/// Whether an HTTP status is worth retrying for a request that may be replayed.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Statuses the server returns before acting on a request. Retrying these is
/// safe even for writes that must not be applied twice.
#[must_use]
pub const fn is_unprocessed_status(status: u16) -> bool {
    matches!(status, 408 | 429)
}
