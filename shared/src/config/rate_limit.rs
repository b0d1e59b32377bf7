//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Admission-control configuration for sensitive endpoints.
///
/// Each caller identity (network address) gets a token bucket of
/// `capacity` requests refilled at `refill_per_minute`. Buckets idle
/// longer than `idle_timeout_seconds` are evicted by a periodic sweep.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Maximum burst of requests per identity
    pub capacity: u32,

    /// Sustained admission rate, in requests per minute per identity
    pub refill_per_minute: u32,

    /// Seconds of inactivity after which an identity's bucket is evicted
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Interval between eviction sweeps, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_per_minute: 5,
            idle_timeout_seconds: default_idle_timeout(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    ///
    /// Reads `AUTH_RATE_LIMIT` (requests per minute, also used as burst
    /// capacity), `RATE_LIMIT_IDLE_SECONDS` and `RATE_LIMIT_SWEEP_SECONDS`.
    pub fn from_env() -> Self {
        let per_minute: u32 = std::env::var("AUTH_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let idle_timeout_seconds = std::env::var("RATE_LIMIT_IDLE_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_idle_timeout);
        let sweep_interval_seconds = std::env::var("RATE_LIMIT_SWEEP_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_sweep_interval);

        Self {
            capacity: per_minute,
            refill_per_minute: per_minute,
            idle_timeout_seconds,
            sweep_interval_seconds,
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            capacity: 100,
            refill_per_minute: 100,
            ..Default::default()
        }
    }

    /// Create a production configuration (stricter limits)
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_idle_timeout() -> u64 {
    300 // 5 minutes
}

fn default_sweep_interval() -> u64 {
    60 // 1 minute
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = RateLimitConfig::default();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.refill_per_minute, 5);
        assert_eq!(config.idle_timeout_seconds, 300);
        assert_eq!(config.sweep_interval_seconds, 60);
    }

    #[test]
    fn test_development_is_more_lenient() {
        let dev = RateLimitConfig::development();
        let prod = RateLimitConfig::production();
        assert!(dev.capacity > prod.capacity);
    }
}
