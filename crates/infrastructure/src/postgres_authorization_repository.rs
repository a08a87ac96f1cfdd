use std::str::FromStr;

use async_trait::async_trait;

use sangathan_application::AuthorizationRepository;
use sangathan_core::{AppError, AppResult};
use sangathan_domain::{Permission, Role, SidebarAccess};

use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for subject role lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AssignedRoleRow {
    role_id: uuid::Uuid,
    role_name: String,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

#[derive(Debug, FromRow)]
struct SidebarPathRow {
    path: String,
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn find_role_for_subject(&self, subject: &str) -> AppResult<Option<Role>> {
        let assigned = sqlx::query_as::<_, AssignedRoleRow>(
            r#"
            SELECT roles.id AS role_id, roles.name AS role_name
            FROM rbac_subject_roles AS subject_roles
            INNER JOIN rbac_roles AS roles
                ON roles.id = subject_roles.role_id
            WHERE subject_roles.subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load role assignment: {error}"))
        })?;

        let Some(assigned) = assigned else {
            return Ok(None);
        };

        let grant_rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permission
            FROM rbac_role_grants
            WHERE role_id = $1
            "#,
        )
        .bind(assigned.role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        let permissions = grant_rows
            .into_iter()
            .map(|row| {
                Permission::from_str(row.permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode permission '{}' for role '{}': {error}",
                        row.permission, assigned.role_name
                    ))
                })
            })
            .collect::<AppResult<Vec<Permission>>>()?;

        let path_rows = sqlx::query_as::<_, SidebarPathRow>(
            r#"
            SELECT path
            FROM rbac_role_sidebar_paths
            WHERE role_id = $1
            "#,
        )
        .bind(assigned.role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load sidebar paths: {error}"))
        })?;

        let sidebar = SidebarAccess::from_entries(path_rows.into_iter().map(|row| row.path));

        Role::new(assigned.role_name, permissions, sidebar).map(Some)
    }
}
