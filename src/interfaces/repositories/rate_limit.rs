use crate::entities::rate_limit::RateLimitDecision;

pub trait RateLimitStore: Send + Sync {
    /// Counts one request from `address` at `now_ms` and reports whether it is allowed.
    fn check(&self, address: &str, now_ms: i64) -> RateLimitDecision;

    /// Drops every entry whose window has elapsed. Returns how many were removed.
    fn purge_expired(&self, now_ms: i64) -> usize;
}
