use async_trait::async_trait;

use sangathan_application::{
    BoothRecord, DirectoryRepository, DistrictRecord, DivisionRecord, StateRecord,
};
use sangathan_core::{AppError, AppResult};
use sangathan_domain::{Booth, District, Division, StateUnit};

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed repository for the geographic directory.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StateRow {
    code: String,
    name: String,
}

#[derive(Debug, FromRow)]
struct DistrictRow {
    id: Uuid,
    name: String,
    state_code: String,
}

#[derive(Debug, FromRow)]
struct DivisionRow {
    id: Uuid,
    name: String,
    district_id: Uuid,
}

#[derive(Debug, FromRow)]
struct BoothRow {
    id: Uuid,
    number: i32,
    name: String,
    division_id: Uuid,
}

fn map_write_error(error: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        if database_error.is_unique_violation() {
            return AppError::Conflict(format!("{what} already exists"));
        }
        if database_error.is_foreign_key_violation() {
            return AppError::Conflict(format!("{what} is still referenced by child units"));
        }
    }

    AppError::Internal(format!("failed to write {what}: {error}"))
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn list_states(&self) -> AppResult<Vec<StateRecord>> {
        let rows = sqlx::query_as::<_, StateRow>(
            "SELECT code, name FROM directory_states ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list states: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| StateRecord {
                code: row.code,
                name: row.name,
            })
            .collect())
    }

    async fn find_state(&self, code: &str) -> AppResult<Option<StateRecord>> {
        let row = sqlx::query_as::<_, StateRow>(
            "SELECT code, name FROM directory_states WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load state: {error}")))?;

        Ok(row.map(|row| StateRecord {
            code: row.code,
            name: row.name,
        }))
    }

    async fn insert_state(&self, state: &StateUnit) -> AppResult<StateRecord> {
        sqlx::query("INSERT INTO directory_states (code, name) VALUES ($1, $2)")
            .bind(state.code())
            .bind(state.name())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "state"))?;

        Ok(StateRecord {
            code: state.code().to_owned(),
            name: state.name().to_owned(),
        })
    }

    async fn update_state(&self, code: &str, name: &str) -> AppResult<StateRecord> {
        let updated = sqlx::query("UPDATE directory_states SET name = $2 WHERE code = $1")
            .bind(code)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "state"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("state '{code}' does not exist")));
        }

        Ok(StateRecord {
            code: code.to_owned(),
            name: name.to_owned(),
        })
    }

    async fn delete_state(&self, code: &str) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM directory_states WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "state"))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("state '{code}' does not exist")));
        }

        Ok(())
    }

    async fn list_districts(&self, state_code: Option<&str>) -> AppResult<Vec<DistrictRecord>> {
        let rows = sqlx::query_as::<_, DistrictRow>(
            r#"
            SELECT id, name, state_code
            FROM directory_districts
            WHERE $1::text IS NULL OR state_code = $1
            ORDER BY name
            "#,
        )
        .bind(state_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list districts: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| DistrictRecord {
                id: row.id,
                name: row.name,
                state_code: row.state_code,
            })
            .collect())
    }

    async fn find_district(&self, id: Uuid) -> AppResult<Option<DistrictRecord>> {
        let row = sqlx::query_as::<_, DistrictRow>(
            "SELECT id, name, state_code FROM directory_districts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load district: {error}")))?;

        Ok(row.map(|row| DistrictRecord {
            id: row.id,
            name: row.name,
            state_code: row.state_code,
        }))
    }

    async fn insert_district(&self, district: &District) -> AppResult<DistrictRecord> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO directory_districts (name, state_code)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(district.name())
        .bind(district.state_code())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "district"))?;

        Ok(DistrictRecord {
            id,
            name: district.name().to_owned(),
            state_code: district.state_code().to_owned(),
        })
    }

    async fn update_district(&self, id: Uuid, district: &District) -> AppResult<DistrictRecord> {
        let updated = sqlx::query(
            "UPDATE directory_districts SET name = $2, state_code = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(district.name())
        .bind(district.state_code())
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "district"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("district '{id}' does not exist")));
        }

        Ok(DistrictRecord {
            id,
            name: district.name().to_owned(),
            state_code: district.state_code().to_owned(),
        })
    }

    async fn delete_district(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM directory_districts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "district"))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("district '{id}' does not exist")));
        }

        Ok(())
    }

    async fn list_divisions(&self, district_id: Option<Uuid>) -> AppResult<Vec<DivisionRecord>> {
        let rows = sqlx::query_as::<_, DivisionRow>(
            r#"
            SELECT id, name, district_id
            FROM directory_divisions
            WHERE $1::uuid IS NULL OR district_id = $1
            ORDER BY name
            "#,
        )
        .bind(district_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list divisions: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| DivisionRecord {
                id: row.id,
                name: row.name,
                district_id: row.district_id,
            })
            .collect())
    }

    async fn find_division(&self, id: Uuid) -> AppResult<Option<DivisionRecord>> {
        let row = sqlx::query_as::<_, DivisionRow>(
            "SELECT id, name, district_id FROM directory_divisions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load division: {error}")))?;

        Ok(row.map(|row| DivisionRecord {
            id: row.id,
            name: row.name,
            district_id: row.district_id,
        }))
    }

    async fn insert_division(&self, division: &Division) -> AppResult<DivisionRecord> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO directory_divisions (name, district_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(division.name())
        .bind(division.district_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "division"))?;

        Ok(DivisionRecord {
            id,
            name: division.name().to_owned(),
            district_id: division.district_id(),
        })
    }

    async fn update_division(&self, id: Uuid, division: &Division) -> AppResult<DivisionRecord> {
        let updated = sqlx::query("UPDATE directory_divisions SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(division.name())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "division"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("division '{id}' does not exist")));
        }

        Ok(DivisionRecord {
            id,
            name: division.name().to_owned(),
            district_id: division.district_id(),
        })
    }

    async fn delete_division(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM directory_divisions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "division"))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("division '{id}' does not exist")));
        }

        Ok(())
    }

    async fn list_booths(&self, division_id: Option<Uuid>) -> AppResult<Vec<BoothRecord>> {
        let rows = sqlx::query_as::<_, BoothRow>(
            r#"
            SELECT id, number, name, division_id
            FROM directory_booths
            WHERE $1::uuid IS NULL OR division_id = $1
            ORDER BY number
            "#,
        )
        .bind(division_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list booths: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| BoothRecord {
                id: row.id,
                number: row.number,
                name: row.name,
                division_id: row.division_id,
            })
            .collect())
    }

    async fn insert_booth(&self, booth: &Booth) -> AppResult<BoothRecord> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO directory_booths (number, name, division_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(booth.number())
        .bind(booth.name())
        .bind(booth.division_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "booth"))?;

        Ok(BoothRecord {
            id,
            number: booth.number(),
            name: booth.name().to_owned(),
            division_id: booth.division_id(),
        })
    }

    async fn update_booth(&self, id: Uuid, booth: &Booth) -> AppResult<BoothRecord> {
        let updated = sqlx::query(
            "UPDATE directory_booths SET number = $2, name = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(booth.number())
        .bind(booth.name())
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "booth"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("booth '{id}' does not exist")));
        }

        Ok(BoothRecord {
            id,
            number: booth.number(),
            name: booth.name().to_owned(),
            division_id: booth.division_id(),
        })
    }

    async fn delete_booth(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM directory_booths WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "booth"))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("booth '{id}' does not exist")));
        }

        Ok(())
    }
}
