//! Configuration for the in-process rate limiter

use std::time::Duration;

/// Configuration for the in-process rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum burst of requests per identity
    pub capacity: u32,

    /// Sustained admission rate, in requests per minute per identity
    pub refill_per_minute: u32,

    /// Inactivity span after which an identity's bucket may be evicted
    pub idle_timeout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_per_minute: 5,
            idle_timeout: Duration::from_secs(300),
        }
    }
}
