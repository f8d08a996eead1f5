use std::{collections::HashMap, sync::Arc};
use parking_lot::Mutex;

use crate::{
    entities::rate_limit::{RateLimitDecision, RateLimitEntry, RateLimitPolicy},
    repositories::rate_limit::RateLimitStore,
};

fn window_key(address: &str) -> String {
    format!("window:{}", address)
}

fn day_key(address: &str) -> String {
    format!("day:{}", address)
}

/// Window and daily counters per client address, held in process memory.
///
/// Every check sweeps stale entries for all addresses before counting, and the
/// whole check-and-increment runs under one lock so concurrent workers cannot
/// both slip under a cap.
#[derive(Clone)]
pub struct InMemoryRateLimiter {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    policy: RateLimitPolicy,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            policy,
        }
    }

    /// Number of live and stale entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.lock().get(key).copied()
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}

impl RateLimitStore for InMemoryRateLimiter {
    fn check(&self, address: &str, now_ms: i64) -> RateLimitDecision {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired(now_ms));

        let window_key = window_key(address);
        let day_key = day_key(address);

        if let Some(day) = entries.get(&day_key) {
            if day.count >= self.policy.daily_max {
                return RateLimitDecision::reject(day.reset_time);
            }
        }
        if let Some(window) = entries.get(&window_key) {
            if window.count >= self.policy.window_max {
                return RateLimitDecision::reject(window.reset_time);
            }
        }

        entries
            .entry(window_key)
            .or_insert(RateLimitEntry { count: 0, reset_time: now_ms + self.policy.window_ms })
            .count += 1;
        entries
            .entry(day_key)
            .or_insert(RateLimitEntry { count: 0, reset_time: now_ms + self.policy.daily_ms })
            .count += 1;

        RateLimitDecision::allow()
    }

    fn purge_expired(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now_ms));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * 1000;
    const HOUR: i64 = 60 * MINUTE;
    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn sixth_request_in_window_is_rejected() {
        let limiter = InMemoryRateLimiter::default();

        for i in 0..5 {
            assert!(limiter.check("1.2.3.4", T0 + i).allowed, "request {} should pass", i + 1);
        }
        let decision = limiter.check("1.2.3.4", T0 + 10);

        assert!(!decision.allowed);
        assert_eq!(decision.reset_time, Some(T0 + 15 * MINUTE));
    }

    #[test]
    fn addresses_are_counted_independently() {
        let limiter = InMemoryRateLimiter::default();

        for _ in 0..5 {
            limiter.check("1.2.3.4", T0);
        }

        assert!(!limiter.check("1.2.3.4", T0).allowed);
        assert!(limiter.check("5.6.7.8", T0).allowed);
    }

    #[test]
    fn window_reopens_after_expiry() {
        let limiter = InMemoryRateLimiter::default();
        for _ in 0..5 {
            limiter.check("a", T0);
        }

        assert!(!limiter.check("a", T0 + 15 * MINUTE - 1).allowed);
        assert!(limiter.check("a", T0 + 15 * MINUTE).allowed);
    }

    #[test]
    fn twenty_first_request_in_a_day_is_rejected() {
        let limiter = InMemoryRateLimiter::default();

        // four full windows of five
        for window in 0..4 {
            let start = T0 + window * 16 * MINUTE;
            for _ in 0..5 {
                assert!(limiter.check("a", start).allowed);
            }
        }

        let later = T0 + 5 * HOUR;
        let decision = limiter.check("a", later);

        assert!(!decision.allowed);
        assert_eq!(decision.reset_time, Some(T0 + 24 * HOUR));
        assert_eq!(limiter.entry("window:a"), None);
    }

    #[test]
    fn day_reset_is_anchored_to_first_request() {
        let limiter = InMemoryRateLimiter::default();
        limiter.check("a", T0);
        limiter.check("a", T0 + 3 * HOUR);

        let day = limiter.entry("day:a").unwrap();
        assert_eq!(day.count, 2);
        assert_eq!(day.reset_time, T0 + 24 * HOUR);
    }

    #[test]
    fn check_sweeps_stale_entries_of_other_addresses() {
        let limiter = InMemoryRateLimiter::default();
        limiter.check("old", T0);
        assert_eq!(limiter.len(), 2);

        limiter.check("new", T0 + 25 * HOUR);

        assert!(limiter.entry("day:old").is_none());
        assert!(limiter.entry("window:old").is_none());
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn purge_reports_removed_entries() {
        let limiter = InMemoryRateLimiter::default();
        limiter.check("a", T0);
        limiter.check("b", T0);

        assert_eq!(limiter.purge_expired(T0 + 20 * MINUTE), 2);
        assert_eq!(limiter.len(), 2);
        assert_eq!(limiter.purge_expired(T0 + 25 * HOUR), 2);
        assert!(limiter.is_empty());
    }

    #[test]
    fn retry_after_rounds_up() {
        let decision = RateLimitDecision::reject(T0 + 1_500);
        assert_eq!(decision.retry_after_secs(T0), 2);
        assert_eq!(RateLimitDecision::reject(T0).retry_after_secs(T0 + 5), 1);
    }

    #[test]
    fn concurrent_checks_never_exceed_the_window_cap() {
        let limiter = InMemoryRateLimiter::default();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.check("shared", T0).allowed)
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(allowed, 5);
    }
}
