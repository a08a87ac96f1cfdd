use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use sangathan_application::AuthEvent;
use sangathan_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;
use super::session_helpers::extract_request_context;

/// POST /auth/logout - Delete the session.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> ApiResult<StatusCode> {
    let subject = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.subject().to_owned());

    if let Some(ref subject) = subject {
        state.session_snapshots.invalidate(subject).await;
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject,
            event_type: "logout".to_owned(),
            outcome: "success".to_owned(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current identity plus resolved access.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let role = state
        .session_snapshots
        .current_role(user.subject())
        .await?;

    Ok(Json(UserIdentityResponse::from_identity_with_role(
        user, role,
    )))
}

/// GET /auth/refresh - Re-resolve the caller's authorization snapshot.
///
/// This is the explicit re-poll the dashboard performs on its refresh
/// interval; it bypasses the snapshot cache entirely.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let role = state.session_snapshots.refresh(user.subject()).await?;

    Ok(Json(UserIdentityResponse::from_identity_with_role(
        user, role,
    )))
}
