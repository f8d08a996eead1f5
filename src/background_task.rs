use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{limiter::rate_limiter::InMemoryRateLimiter, repositories::rate_limit::RateLimitStore};

/// Drops stale rate-limit entries every hour so idle addresses do not linger.
pub async fn start_purge_task(limiter: InMemoryRateLimiter) {
    let mut interval = interval(Duration::from_secs(60 * 60));

    loop {
        interval.tick().await;

        let purged = limiter.purge_expired(Utc::now().timestamp_millis());
        if purged > 0 {
            tracing::info!("Purged {} expired rate-limit entries", purged);
        }
    }
}
