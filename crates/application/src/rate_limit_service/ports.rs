use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sangathan_core::AppResult;

/// Counter state for one rate limit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Attempts recorded inside the current window, including this one.
    pub attempt_count: i32,
}

/// Repository port for rate limit counters.
#[async_trait]
pub trait RateLimitRepository: Send + Sync {
    /// Records an attempt for the key and returns the updated counter.
    ///
    /// Attempts older than the window are not counted.
    async fn record_attempt(&self, key: &str, window_seconds: i64) -> AppResult<RateLimitInfo>;

    /// Removes entries last touched before the cutoff. Returns rows removed.
    async fn cleanup_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
