use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use sangathan_application::{AuthEvent, CreateUserParams};
use sangathan_core::AppError;
use sangathan_domain::SUPERADMIN_ROLE_NAME;
use serde::Deserialize;

use crate::dto::GenericMessageResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::extract_request_context;

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub token: String,
}

/// POST /auth/bootstrap - Create the first superadmin account.
///
/// Gated by the deployment's bootstrap token; the created subject gets the
/// superadmin role assigned directly, bypassing the usual role-manage
/// permission check that no subject could pass yet.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = state
        .user_service
        .create_user(
            "bootstrap",
            CreateUserParams {
                email: payload.email,
                display_name: payload.display_name,
                password: payload.password,
            },
        )
        .await?;

    let subject = user_id.to_string();
    state
        .security_admin_service
        .assign_role_bypassing_checks(&subject, SUPERADMIN_ROLE_NAME)
        .await?;

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject: Some(subject),
            event_type: "bootstrap".to_owned(),
            outcome: "success".to_owned(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenericMessageResponse {
            message: "superadmin account created; sign in to continue".to_owned(),
        }),
    ))
}
