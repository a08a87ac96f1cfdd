use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sangathan_application::{FAILED_LOGIN_LOCK_THRESHOLD, UserRecord, UserRepository};
use sangathan_core::{AppError, AppResult};
use sangathan_domain::UserId;

use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

/// Minutes an account stays locked after too many failed logins.
const LOCKOUT_MINUTES: i32 = 15;

/// PostgreSQL-backed repository for user accounts.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    failed_login_count: i32,
    locked_until: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            failed_login_count: row.failed_login_count,
            locked_until: row.locked_until,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, display_name, password_hash, failed_login_count, locked_until";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY email"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn create(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> AppResult<UserId> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (email, display_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.is_unique_violation()
            {
                return AppError::Conflict(format!("a user with email '{email}' already exists"));
            }
            AppError::Internal(format!("failed to create user: {error}"))
        })?;

        Ok(UserId::from_uuid(id))
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        Ok(())
    }

    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()> {
        let locked = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE users
            SET failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2
                        THEN now() + make_interval(mins => $3)
                    ELSE locked_until
                END
            WHERE id = $1
            RETURNING locked_until IS NOT NULL AND locked_until > now()
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(FAILED_LOGIN_LOCK_THRESHOLD)
        .bind(LOCKOUT_MINUTES)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to record failed login: {error}"))
        })?;

        if locked == Some(true) {
            warn!(user_id = %user_id, "account locked after repeated failed logins");
        }

        Ok(())
    }

    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to reset login counter: {error}"))
        })?;

        Ok(())
    }
}
