use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use sangathan_application::CreateRoleInput;
use sangathan_core::UserIdentity;
use sangathan_domain::Permission;
use serde::Deserialize;

use crate::dto::{
    AssignRoleRequest, AuditLogEntryResponse, CreateRoleRequest, PermissionInfoResponse,
    RemoveRoleAssignmentRequest, RoleAssignmentResponse, RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(user.subject())
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let permissions = payload
        .permissions
        .iter()
        .map(|value| Permission::from_transport(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let role = state
        .security_admin_service
        .create_role(
            user.subject(),
            CreateRoleInput {
                name: payload.name,
                permissions,
                sidebar_paths: payload.sidebar_paths,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn list_permission_catalog_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionInfoResponse>>> {
    let catalog = state
        .security_admin_service
        .list_permission_catalog(user.subject())
        .await?
        .iter()
        .copied()
        .map(PermissionInfoResponse::from)
        .collect();

    Ok(Json(catalog))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .assign_role(
            user.subject(),
            payload.subject.as_str(),
            payload.role_name.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RemoveRoleAssignmentRequest>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .unassign_role(
            user.subject(),
            payload.subject.as_str(),
            payload.role_name.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_role_assignments(user.subject())
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .security_admin_service
        .list_audit_log(user.subject(), query.limit.unwrap_or(100))
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
