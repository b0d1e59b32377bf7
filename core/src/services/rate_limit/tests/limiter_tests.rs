//! Tests for the token-bucket limiter.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::services::rate_limit::{RateLimiter, RateLimiterConfig};

fn limiter() -> RateLimiter {
    RateLimiter::new(RateLimiterConfig {
        capacity: 5,
        refill_per_minute: 5,
        idle_timeout: Duration::from_secs(300),
    })
}

#[test]
fn test_burst_up_to_capacity_then_refusal() {
    let limiter = limiter();
    let now = Instant::now();

    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", now));
    }
    // Sixth call within the same instant is refused
    assert!(!limiter.allow_at("198.51.100.1", now));
}

#[test]
fn test_refill_admits_again_after_one_interval() {
    let limiter = limiter();
    let now = Instant::now();

    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", now));
    }
    assert!(!limiter.allow_at("198.51.100.1", now + Duration::from_secs(1)));

    // One full refill interval restores at least one token
    assert!(limiter.allow_at("198.51.100.1", now + Duration::from_secs(61)));
}

#[test]
fn test_refill_is_capped_at_capacity() {
    let limiter = limiter();
    let now = Instant::now();

    assert!(limiter.allow_at("198.51.100.1", now));

    // After a very long idle span the budget is capacity, not more
    let later = now + Duration::from_secs(3600);
    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", later));
    }
    assert!(!limiter.allow_at("198.51.100.1", later));
}

#[test]
fn test_identities_have_independent_budgets() {
    let limiter = limiter();
    let now = Instant::now();

    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", now));
    }
    assert!(!limiter.allow_at("198.51.100.1", now));

    // A different caller is unaffected
    assert!(limiter.allow_at("198.51.100.2", now));
    assert_eq!(limiter.tracked_identities(), 2);
}

#[test]
fn test_idle_buckets_are_evicted_and_reset_on_return() {
    let limiter = limiter();
    let now = Instant::now();

    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", now));
    }
    assert_eq!(limiter.tracked_identities(), 1);

    // Idle past the threshold: the sweep drops the bucket
    let evicted = limiter.sweep_at(now + Duration::from_secs(301));
    assert_eq!(evicted, 1);
    assert_eq!(limiter.tracked_identities(), 0);

    // A returning caller starts with a brand-new budget
    let back = now + Duration::from_secs(302);
    for _ in 0..5 {
        assert!(limiter.allow_at("198.51.100.1", back));
    }
    assert!(!limiter.allow_at("198.51.100.1", back));
}

#[test]
fn test_sweep_keeps_recently_seen_buckets() {
    let limiter = limiter();
    let now = Instant::now();

    limiter.allow_at("stale", now);
    limiter.allow_at("fresh", now + Duration::from_secs(250));

    let evicted = limiter.sweep_at(now + Duration::from_secs(301));

    assert_eq!(evicted, 1);
    assert_eq!(limiter.tracked_identities(), 1);
    // "fresh" kept its partially drained bucket
    for _ in 0..4 {
        assert!(limiter.allow_at("fresh", now + Duration::from_secs(250)));
    }
    assert!(!limiter.allow_at("fresh", now + Duration::from_secs(250)));
}

#[test]
fn test_concurrent_callers_never_exceed_the_budget() {
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
        capacity: 100,
        refill_per_minute: 0,
        idle_timeout: Duration::from_secs(300),
    }));
    let now = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let limiter = Arc::clone(&limiter);
        handles.push(thread::spawn(move || {
            let mut admitted = 0usize;
            for _ in 0..50 {
                if limiter.allow_at("shared-identity", now) {
                    admitted += 1;
                }
            }
            admitted
        }));
    }

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // 8 threads x 50 attempts against a budget of 100 with no refill:
    // exactly the budget is admitted, regardless of interleaving
    assert_eq!(admitted, 100);
    assert_eq!(limiter.tracked_identities(), 1);
}
