use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use sangathan_application::CreateUserParams;
use sangathan_core::{AppError, UserIdentity};
use sangathan_domain::UserId;

use crate::dto::{CreateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let id = UserId::from_uuid(parse_uuid(&id, "user")?);
    let user = state
        .user_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{id}' does not exist")))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user_id = state
        .user_service
        .create_user(
            user.subject(),
            CreateUserParams {
                email: payload.email,
                display_name: payload.display_name,
                password: payload.password,
            },
        )
        .await?;

    if let Some(role_name) = payload.role_name.as_deref() {
        state
            .security_admin_service
            .assign_role(user.subject(), &user_id.to_string(), role_name)
            .await?;
    }

    let created = state
        .user_service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Internal("created user could not be loaded".to_owned()))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}
