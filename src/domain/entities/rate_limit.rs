use serde::Serialize;

/// A counter for one address over one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitEntry {
    pub count: u32,
    /// Epoch milliseconds after which the entry is stale.
    pub reset_time: i64,
}

impl RateLimitEntry {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.reset_time <= now_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub reset_time: Option<i64>,
}

impl RateLimitDecision {
    pub fn allow() -> Self {
        RateLimitDecision { allowed: true, reset_time: None }
    }

    pub fn reject(reset_time: i64) -> Self {
        RateLimitDecision { allowed: false, reset_time: Some(reset_time) }
    }

    /// Whole seconds until `reset_time`, never less than one.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        match self.reset_time {
            Some(reset) if reset > now_ms => ((reset - now_ms + 999) / 1000) as u64,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub window_max: u32,
    pub window_ms: i64,
    pub daily_max: u32,
    pub daily_ms: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy {
            window_max: 5,
            window_ms: 15 * 60 * 1000,
            daily_max: 20,
            daily_ms: 24 * 60 * 60 * 1000,
        }
    }
}

impl From<&crate::settings::AppConfig> for RateLimitPolicy {
    fn from(config: &crate::settings::AppConfig) -> Self {
        RateLimitPolicy {
            window_max: config.rate_window_max,
            window_ms: config.rate_window_minutes * 60 * 1000,
            daily_max: config.rate_daily_max,
            daily_ms: config.rate_daily_hours * 60 * 60 * 1000,
        }
    }
}
