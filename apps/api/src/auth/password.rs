use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use sangathan_application::AuthOutcome;
use sangathan_core::{AppError, UserIdentity};
use sangathan_domain::UserId;
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::dto::{AuthLoginRequest as LoginRequest, AuthLoginResponse as LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::{establish_session, extract_request_context};

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (ip_address, user_agent) = extract_request_context(&headers);

    let outcome = state
        .user_service
        .login(&payload.email, &payload.password, ip_address, user_agent)
        .await?;

    match outcome {
        AuthOutcome::Authenticated(user) => {
            let subject = user.id.to_string();

            // Warm the snapshot so the first admission check after login
            // does not race the session write.
            let role = state.session_snapshots.refresh(&subject).await?;
            let role_name = role.map(|role| role.name().to_owned()).unwrap_or_default();

            let identity = UserIdentity::new(
                subject,
                user.display_name.clone(),
                Some(user.email.clone()),
                role_name,
            );
            establish_session(&session, &identity).await?;

            Ok(Json(LoginResponse {
                status: "authenticated".to_owned(),
            }))
        }
        AuthOutcome::Failed => {
            // OWASP: generic error message for all failure cases.
            Err(AppError::Unauthorized("invalid email or password".to_owned()).into())
        }
    }
}

/// PUT /api/profile/password - Change the caller's password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user_uuid = Uuid::parse_str(user.subject())
        .map_err(|error| AppError::Internal(format!("invalid session subject: {error}")))?;

    state
        .user_service
        .change_password(
            UserId::from_uuid(user_uuid),
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
