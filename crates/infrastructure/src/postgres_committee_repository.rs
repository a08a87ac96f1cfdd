use std::str::FromStr;

use async_trait::async_trait;

use sangathan_application::{CommitteeRepository, SamitiRecord};
use sangathan_core::{AppError, AppResult};
use sangathan_domain::{CommitteeLevel, Samiti};

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed repository for samiti committees.
#[derive(Clone)]
pub struct PostgresCommitteeRepository {
    pool: PgPool,
}

impl PostgresCommitteeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SamitiRow {
    id: Uuid,
    name: String,
    level: String,
    unit_name: String,
    description: Option<String>,
}

impl SamitiRow {
    fn into_record(self) -> AppResult<SamitiRecord> {
        let level = CommitteeLevel::from_str(self.level.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode committee level '{}': {error}",
                self.level
            ))
        })?;
        let samiti = Samiti::new(self.name, level, self.unit_name, self.description)?;

        Ok(SamitiRecord {
            id: self.id,
            samiti,
        })
    }
}

#[async_trait]
impl CommitteeRepository for PostgresCommitteeRepository {
    async fn list(&self) -> AppResult<Vec<SamitiRecord>> {
        let rows = sqlx::query_as::<_, SamitiRow>(
            r#"
            SELECT id, name, level, unit_name, description
            FROM samitis
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list committees: {error}")))?;

        rows.into_iter().map(SamitiRow::into_record).collect()
    }

    async fn insert(&self, samiti: &Samiti) -> AppResult<SamitiRecord> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO samitis (name, level, unit_name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(samiti.name())
        .bind(samiti.level().as_str())
        .bind(samiti.unit_name())
        .bind(samiti.description())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create committee: {error}")))?;

        Ok(SamitiRecord {
            id,
            samiti: samiti.clone(),
        })
    }

    async fn update(&self, id: Uuid, samiti: &Samiti) -> AppResult<SamitiRecord> {
        let updated = sqlx::query(
            r#"
            UPDATE samitis
            SET name = $2, level = $3, unit_name = $4, description = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(samiti.name())
        .bind(samiti.level().as_str())
        .bind(samiti.unit_name())
        .bind(samiti.description())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update committee: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("committee '{id}' does not exist")));
        }

        Ok(SamitiRecord {
            id,
            samiti: samiti.clone(),
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM samitis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete committee: {error}"))
            })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("committee '{id}' does not exist")));
        }

        Ok(())
    }
}
