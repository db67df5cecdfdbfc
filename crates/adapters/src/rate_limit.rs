//! Leaky-bucket rate limiter for outbound platform calls.
//!
//! The bucket holds at most `bucket_size` tokens and refills continuously at
//! `tokens_per_second`. Refill is lazy: every query computes the elapsed time
//! since the last refill and credits `elapsed * tokens_per_second` tokens,
//! capped at the bucket size.
//!
//! The refill-then-debit step runs under a single mutex so concurrent
//! `acquire` calls can never both observe the same token count and overdraw
//! the bucket. Waiting happens outside the lock, so a caller sleeping for a
//! large cost does not stop others from taking tokens that are available.
//!
//! Time comes from [`tokio::time::Instant`], which is monotonic (and can be
//! paused in tests).

use std::time::Duration;

use marketsync_core::MarketplaceError;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Never sleep for less than this, so float rounding cannot spin the loop.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Rate limiter tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum burst size in tokens.
    pub bucket_size: u32,
    /// Continuous refill rate.
    pub tokens_per_second: f64,
}

impl Default for RateLimitConfig {
    /// Shopify REST standard plan: 40-request bucket leaking 2 per second.
    fn default() -> Self {
        Self {
            bucket_size: 40,
            tokens_per_second: 2.0,
        }
    }
}

impl RateLimitConfig {
    /// Check the tunables are usable.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` for a zero bucket or a
    /// non-positive / non-finite refill rate.
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        if self.bucket_size == 0 {
            return Err(MarketplaceError::Configuration(
                "rate limit bucket size must be at least 1".to_string(),
            ));
        }
        if !self.tokens_per_second.is_finite() || self.tokens_per_second <= 0.0 {
            return Err(MarketplaceError::Configuration(format!(
                "rate limit refill rate must be positive, got {}",
                self.tokens_per_second
            )));
        }
        Ok(())
    }
}

/// Platform-reported call usage (e.g. `X-Shopify-Shop-Api-Call-Limit: 32/40`).
///
/// Telemetry only: it never feeds back into the local token accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformUsage {
    /// Calls currently counted against the platform bucket.
    pub used: u32,
    /// Platform bucket size.
    pub limit: u32,
    /// When the usage was observed.
    pub observed_at: Instant,
}

impl PlatformUsage {
    /// Calls left in the platform bucket.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Counters describing limiter activity since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimiterStats {
    /// Tokens debited.
    pub tokens_acquired: u64,
    /// Number of times a caller had to wait.
    pub waits: u64,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
    stats: LimiterStats,
    platform_usage: Option<PlatformUsage>,
}

impl BucketState {
    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        self.tokens = projected_tokens(self.tokens, self.last_refill, config, now);
        self.last_refill = now;
    }
}

/// Tokens after refilling from `last_refill` to `now`, without mutating state.
fn projected_tokens(tokens: f64, last_refill: Instant, config: &RateLimitConfig, now: Instant) -> f64 {
    // saturating: a clock that appears to go backwards credits nothing
    let elapsed = now.saturating_duration_since(last_refill).as_secs_f64();
    (tokens + elapsed * config.tokens_per_second).min(f64::from(config.bucket_size))
}

/// Leaky-bucket token pool shared by every request of one adapter instance.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    /// Create a limiter that starts with a full bucket.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` if the config is invalid.
    pub fn new(config: RateLimitConfig) -> Result<Self, MarketplaceError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(BucketState {
                tokens: f64::from(config.bucket_size),
                last_refill: Instant::now(),
                stats: LimiterStats::default(),
                platform_usage: None,
            }),
        })
    }

    /// Limiter configuration.
    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until `cost` tokens are available, then debit them.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` immediately if `cost` exceeds
    /// the bucket size, since such a request could never be admitted.
    pub async fn acquire(&self, cost: u32) -> Result<(), MarketplaceError> {
        if cost == 0 {
            return Ok(());
        }
        if cost > self.config.bucket_size {
            return Err(MarketplaceError::Configuration(format!(
                "rate limit cost {cost} exceeds bucket size {}",
                self.config.bucket_size
            )));
        }

        let cost_tokens = f64::from(cost);
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                state.refill(&self.config, Instant::now());

                if state.tokens >= cost_tokens {
                    state.tokens -= cost_tokens;
                    state.stats.tokens_acquired += u64::from(cost);
                    return Ok(());
                }

                state.stats.waits += 1;
                self.wait_for(cost_tokens - state.tokens)
            };

            debug!(
                cost,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "Rate limiter waiting for tokens"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Tokens currently available, after a lazy refill.
    pub async fn available_capacity(&self) -> f64 {
        let mut state = self.state.lock().await;
        state.refill(&self.config, Instant::now());
        state.tokens
    }

    /// Projected wait before `cost` tokens would be available. Does not
    /// mutate the bucket.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` if `cost` exceeds the bucket size.
    pub async fn estimated_wait_time(&self, cost: u32) -> Result<Duration, MarketplaceError> {
        if cost > self.config.bucket_size {
            return Err(MarketplaceError::Configuration(format!(
                "rate limit cost {cost} exceeds bucket size {}",
                self.config.bucket_size
            )));
        }

        let state = self.state.lock().await;
        let tokens = projected_tokens(state.tokens, state.last_refill, &self.config, Instant::now());
        let shortfall = f64::from(cost) - tokens;
        if shortfall <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::from_secs_f64(
            shortfall / self.config.tokens_per_second,
        ))
    }

    /// Record the platform's own view of call usage.
    pub async fn record_platform_usage(&self, used: u32, limit: u32) {
        let mut state = self.state.lock().await;
        state.platform_usage = Some(PlatformUsage {
            used,
            limit,
            observed_at: Instant::now(),
        });
        debug!(used, limit, local_tokens = state.tokens, "Platform call usage");
    }

    /// Last platform-reported call usage, if any.
    pub async fn platform_usage(&self) -> Option<PlatformUsage> {
        self.state.lock().await.platform_usage
    }

    /// Activity counters.
    pub async fn stats(&self) -> LimiterStats {
        self.state.lock().await.stats
    }

    fn wait_for(&self, shortfall: f64) -> Duration {
        Duration::from_secs_f64(shortfall / self.config.tokens_per_second).max(MIN_WAIT)
    }
}
