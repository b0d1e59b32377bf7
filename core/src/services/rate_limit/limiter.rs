//! Token-bucket rate limiter keyed by caller identity.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use super::config::RateLimiterConfig;

/// Per-identity admission budget
struct Bucket {
    /// Tokens currently available, fractional between refills
    available: f64,

    /// Last time this bucket was checked; also drives idle eviction
    last_seen: Instant,
}

/// In-process token-bucket rate limiter.
///
/// One instance is constructed per process and passed by reference to the
/// request layer. Buckets are created lazily on the first request from a
/// new identity and refilled on every check from the time elapsed since
/// the previous one, capped at the configured capacity. Eviction of an
/// idle bucket resets its budget; a returning caller simply starts fresh.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a limiter with the given configuration
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Decide whether a request from `identity` is admitted.
    ///
    /// Refusal is a normal admission-control outcome, not an error.
    pub fn allow(&self, identity: &str) -> bool {
        self.allow_at(identity, Instant::now())
    }

    /// Remove buckets idle longer than the configured timeout.
    ///
    /// Returns the number of buckets evicted. Usually invoked by the
    /// [`Sweeper`](super::Sweeper) on an interval.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Number of identities currently tracked
    pub fn tracked_identities(&self) -> usize {
        self.buckets.lock().expect("limiter lock poisoned").len()
    }

    pub(crate) fn allow_at(&self, identity: &str, now: Instant) -> bool {
        let refill_per_second = f64::from(self.config.refill_per_minute) / 60.0;
        let capacity = f64::from(self.config.capacity);

        let mut buckets = self.buckets.lock().expect("limiter lock poisoned");
        let bucket = buckets.entry(identity.to_string()).or_insert(Bucket {
            available: capacity,
            last_seen: now,
        });

        let elapsed = now.saturating_duration_since(bucket.last_seen);
        bucket.available =
            (bucket.available + elapsed.as_secs_f64() * refill_per_second).min(capacity);
        bucket.last_seen = now;

        if bucket.available >= 1.0 {
            bucket.available -= 1.0;
            true
        } else {
            false
        }
    }

    pub(crate) fn sweep_at(&self, now: Instant) -> usize {
        let idle_timeout = self.config.idle_timeout;
        let mut buckets = self.buckets.lock().expect("limiter lock poisoned");
        let before = buckets.len();
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) <= idle_timeout);
        before - buckets.len()
    }
}
