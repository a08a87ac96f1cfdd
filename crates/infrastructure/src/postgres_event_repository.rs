use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sangathan_application::{EventRepository, OrgEventRecord};
use sangathan_core::{AppError, AppResult};
use sangathan_domain::OrgEvent;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed repository for organizational events.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    venue: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

impl EventRow {
    fn into_record(self) -> AppResult<OrgEventRecord> {
        let event = OrgEvent::new(
            self.title,
            self.venue,
            self.starts_at,
            self.ends_at,
            self.description,
        )?;

        Ok(OrgEventRecord { id: self.id, event })
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn list(&self) -> AppResult<Vec<OrgEventRecord>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, venue, starts_at, ends_at, description
            FROM org_events
            ORDER BY starts_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list events: {error}")))?;

        rows.into_iter().map(EventRow::into_record).collect()
    }

    async fn insert(&self, event: &OrgEvent) -> AppResult<OrgEventRecord> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO org_events (title, venue, starts_at, ends_at, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.title())
        .bind(event.venue())
        .bind(event.starts_at())
        .bind(event.ends_at())
        .bind(event.description())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create event: {error}")))?;

        Ok(OrgEventRecord {
            id,
            event: event.clone(),
        })
    }

    async fn update(&self, id: Uuid, event: &OrgEvent) -> AppResult<OrgEventRecord> {
        let updated = sqlx::query(
            r#"
            UPDATE org_events
            SET title = $2, venue = $3, starts_at = $4, ends_at = $5, description = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(event.title())
        .bind(event.venue())
        .bind(event.starts_at())
        .bind(event.ends_at())
        .bind(event.description())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update event: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("event '{id}' does not exist")));
        }

        Ok(OrgEventRecord {
            id,
            event: event.clone(),
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM org_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete event: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("event '{id}' does not exist")));
        }

        Ok(())
    }
}
