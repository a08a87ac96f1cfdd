use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use sangathan_core::UserIdentity;
use sangathan_domain::{CommitteeLevel, Samiti};

use crate::dto::{SamitiResponse, SaveSamitiRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

fn samiti_from_payload(payload: SaveSamitiRequest) -> Result<Samiti, sangathan_core::AppError> {
    let level = CommitteeLevel::from_str(payload.level.as_str())?;
    Samiti::new(payload.name, level, payload.unit_name, payload.description)
}

pub async fn list_samitis_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<SamitiResponse>>> {
    let samitis = state
        .committee_service
        .list(user.subject())
        .await?
        .into_iter()
        .map(SamitiResponse::from)
        .collect();

    Ok(Json(samitis))
}

pub async fn create_samiti_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveSamitiRequest>,
) -> ApiResult<(StatusCode, Json<SamitiResponse>)> {
    let samiti = samiti_from_payload(payload)?;
    let record = state.committee_service.create(user.subject(), samiti).await?;

    Ok((StatusCode::CREATED, Json(SamitiResponse::from(record))))
}

pub async fn update_samiti_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    Json(payload): Json<SaveSamitiRequest>,
) -> ApiResult<Json<SamitiResponse>> {
    let id = parse_uuid(&id, "committee")?;
    let samiti = samiti_from_payload(payload)?;
    let record = state
        .committee_service
        .update(user.subject(), id, samiti)
        .await?;

    Ok(Json(SamitiResponse::from(record)))
}

pub async fn delete_samiti_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id, "committee")?;
    state.committee_service.delete(user.subject(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
