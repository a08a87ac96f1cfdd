use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sangathan_application::{
    CreateRoleInput, RoleAssignment, RoleDefinition, SecurityAdminRepository,
};
use sangathan_core::{AppError, AppResult};
use sangathan_domain::Permission;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed repository for role administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    is_system: bool,
}

#[derive(Debug, FromRow)]
struct RoleGrantRow {
    role_id: Uuid,
    permission: String,
}

#[derive(Debug, FromRow)]
struct RoleSidebarRow {
    role_id: Uuid,
    path: String,
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    subject: String,
    role_id: Uuid,
    role_name: String,
    assigned_at: DateTime<Utc>,
}

fn map_role_conflict(error: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.is_unique_violation()
    {
        return AppError::Conflict(format!("role '{name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let role_rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, is_system
            FROM rbac_roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        let grant_rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT role_id, permission
            FROM rbac_role_grants
            ORDER BY permission
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role grants: {error}")))?;

        let sidebar_rows = sqlx::query_as::<_, RoleSidebarRow>(
            r#"
            SELECT role_id, path
            FROM rbac_role_sidebar_paths
            ORDER BY path
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list sidebar paths: {error}"))
        })?;

        let mut grants_by_role: HashMap<Uuid, Vec<Permission>> = HashMap::new();
        for row in grant_rows {
            let permission = Permission::from_str(row.permission.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode permission '{}': {error}",
                    row.permission
                ))
            })?;
            grants_by_role.entry(row.role_id).or_default().push(permission);
        }

        let mut sidebar_by_role: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in sidebar_rows {
            sidebar_by_role.entry(row.role_id).or_default().push(row.path);
        }

        Ok(role_rows
            .into_iter()
            .map(|row| RoleDefinition {
                role_id: row.id.to_string(),
                name: row.name,
                is_system: row.is_system,
                permissions: grants_by_role.remove(&row.id).unwrap_or_default(),
                sidebar_paths: sidebar_by_role.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO rbac_roles (name, is_system)
            VALUES ($1, false)
            RETURNING id
            "#,
        )
        .bind(input.name.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, input.name.as_str()))?;

        for permission in &input.permissions {
            sqlx::query(
                r#"
                INSERT INTO rbac_role_grants (role_id, permission)
                VALUES ($1, $2)
                ON CONFLICT (role_id, permission) DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(permission.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role grants: {error}"))
            })?;
        }

        for path in &input.sidebar_paths {
            sqlx::query(
                r#"
                INSERT INTO rbac_role_sidebar_paths (role_id, path)
                VALUES ($1, $2)
                ON CONFLICT (role_id, path) DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(path.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist sidebar paths: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit role creation: {error}"))
        })?;

        Ok(RoleDefinition {
            role_id: role_id.to_string(),
            name: input.name,
            is_system: false,
            permissions: input.permissions,
            sidebar_paths: input.sidebar_paths,
        })
    }

    async fn assign_role_to_subject(&self, subject: &str, role_name: &str) -> AppResult<()> {
        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM rbac_roles WHERE name = $1
            "#,
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up role: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' does not exist")))?;

        // One role per subject; a new assignment replaces the old one.
        sqlx::query(
            r#"
            INSERT INTO rbac_subject_roles (subject, role_id)
            VALUES ($1, $2)
            ON CONFLICT (subject) DO UPDATE
                SET role_id = EXCLUDED.role_id, assigned_at = now()
            "#,
        )
        .bind(subject)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to assign role: {error}")))?;

        Ok(())
    }

    async fn remove_role_from_subject(&self, subject: &str, role_name: &str) -> AppResult<()> {
        let removed = sqlx::query(
            r#"
            DELETE FROM rbac_subject_roles
            USING rbac_roles
            WHERE rbac_subject_roles.role_id = rbac_roles.id
                AND rbac_subject_roles.subject = $1
                AND rbac_roles.name = $2
            "#,
        )
        .bind(subject)
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove assignment: {error}")))?;

        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "subject '{subject}' has no assignment for role '{role_name}'"
            )));
        }

        Ok(())
    }

    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT
                subject_roles.subject,
                subject_roles.role_id,
                roles.name AS role_name,
                subject_roles.assigned_at
            FROM rbac_subject_roles AS subject_roles
            INNER JOIN rbac_roles AS roles
                ON roles.id = subject_roles.role_id
            ORDER BY subject_roles.subject
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list assignments: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| RoleAssignment {
                subject: row.subject,
                role_id: row.role_id.to_string(),
                role_name: row.role_name,
                assigned_at: row.assigned_at.to_rfc3339(),
            })
            .collect())
    }
}
