use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sangathan_application::{RateLimitInfo, RateLimitRepository};
use sangathan_core::{AppError, AppResult};

use sqlx::PgPool;

/// PostgreSQL-backed fixed-window rate limit counters.
#[derive(Clone)]
pub struct PostgresRateLimitRepository {
    pool: PgPool,
}

impl PostgresRateLimitRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitRepository for PostgresRateLimitRepository {
    async fn record_attempt(&self, key: &str, window_seconds: i64) -> AppResult<RateLimitInfo> {
        // Fixed window: a counter resets once its window has fully elapsed.
        let attempt_count = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO rate_limit_counters (key, window_started_at, attempt_count, last_attempt_at)
            VALUES ($1, now(), 1, now())
            ON CONFLICT (key) DO UPDATE SET
                attempt_count = CASE
                    WHEN rate_limit_counters.window_started_at < now() - make_interval(secs => $2)
                        THEN 1
                    ELSE rate_limit_counters.attempt_count + 1
                END,
                window_started_at = CASE
                    WHEN rate_limit_counters.window_started_at < now() - make_interval(secs => $2)
                        THEN now()
                    ELSE rate_limit_counters.window_started_at
                END,
                last_attempt_at = now()
            RETURNING attempt_count
            "#,
        )
        .bind(key)
        .bind(window_seconds as f64)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to record rate limit attempt: {error}"))
        })?;

        Ok(RateLimitInfo { attempt_count })
    }

    async fn cleanup_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let deleted = sqlx::query("DELETE FROM rate_limit_counters WHERE last_attempt_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clean up rate limits: {error}"))
            })?;

        Ok(deleted.rows_affected())
    }
}
