use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use sangathan_core::{AppError, UserIdentity};
use sangathan_domain::OrgEvent;

use crate::dto::{EventResponse, SaveEventRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| AppError::Validation(format!("invalid {field} timestamp: {error}")))
}

fn event_from_payload(payload: SaveEventRequest) -> Result<OrgEvent, AppError> {
    let starts_at = parse_timestamp(&payload.starts_at, "starts_at")?;
    let ends_at = payload
        .ends_at
        .as_deref()
        .map(|value| parse_timestamp(value, "ends_at"))
        .transpose()?;

    OrgEvent::new(
        payload.title,
        payload.venue,
        starts_at,
        ends_at,
        payload.description,
    )
}

pub async fn list_events_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list(user.subject())
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = event_from_payload(payload)?;
    let record = state.event_service.create(user.subject(), event).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(record))))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    Json(payload): Json<SaveEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let id = parse_uuid(&id, "event")?;
    let event = event_from_payload(payload)?;
    let record = state.event_service.update(user.subject(), id, event).await?;

    Ok(Json(EventResponse::from(record)))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id, "event")?;
    state.event_service.delete(user.subject(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
