use axum::Json;
use axum::extract::{Extension, State};
use sangathan_core::UserIdentity;

use crate::dto::MenuItemResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/navigation - Sidebar menu filtered to the caller's access.
pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<MenuItemResponse>>> {
    let menu = state
        .authorization_service
        .resolve_navigation(user.subject())
        .await?
        .into_iter()
        .map(MenuItemResponse::from)
        .collect();

    Ok(Json(menu))
}
