//! Client-side request throttling
//!
//! Open Food Facts asks API clients to stay under 100 product reads per
//! minute. The limiter keeps one token bucket per host and refuses a request
//! locally instead of letting the server start rejecting us.
//!
//! ```rust
//! use labelcheck_core::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(100));
//! assert!(limiter.try_acquire("world.openfoodfacts.org").is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
    /// Extra requests allowed in a short burst
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(100)
    }
}

impl RateLimitConfig {
    /// Per-minute limit without burst allowance
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_requests: max,
            window_secs: 60,
            burst: 0,
        }
    }

    /// Explicit limit
    #[must_use]
    pub fn new(max_requests: u32, window: Duration, burst: u32) -> Self {
        Self {
            max_requests,
            window_secs: window.as_secs().max(1),
            burst,
        }
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests + self.burst)
    }

    fn refill_per_sec(&self) -> f64 {
        f64::from(self.max_requests) / self.window_secs.max(1) as f64
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(config: &RateLimitConfig) -> Self {
        Self {
            tokens: config.capacity(),
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, config: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_per_sec()).min(config.capacity());
        self.last_update = now;
    }
}

/// Token-bucket limiter keyed by host
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    /// Create a limiter; every host starts with a full bucket
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Take one token for `key`
    ///
    /// On refusal returns how long until a token becomes available.
    pub fn try_acquire(&self, key: &str) -> Result<(), Duration> {
        // A poisoned lock still holds valid counters
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(&self.config));
        bucket.refill(&self.config);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let rate = self.config.refill_per_sec();
            let wait = if rate > 0.0 {
                Duration::from_secs_f64((1.0 - bucket.tokens) / rate)
            } else {
                Duration::from_secs(self.config.window_secs)
            };
            Err(wait)
        }
    }

    /// Whole tokens currently available for `key`
    #[must_use]
    pub fn available(&self, key: &str) -> u32 {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(&self.config));
        bucket.refill(&self.config);
        bucket.tokens as u32
    }

    /// Forget the bucket for `key`
    pub fn reset(&self, key: &str) {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        buckets.remove(key);
    }
}
