use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use sangathan_core::UserIdentity;
use sangathan_domain::{Booth, District, Division, StateUnit};
use serde::Deserialize;

use crate::dto::{
    BoothResponse, CreateDistrictRequest, CreateStateRequest, DistrictResponse,
    DivisionResponse, SaveBoothRequest, SaveDivisionRequest, StateResponse,
    UpdateStateRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

pub async fn list_states_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<StateResponse>>> {
    let states = state
        .directory_service
        .list_states(user.subject())
        .await?
        .into_iter()
        .map(StateResponse::from)
        .collect();

    Ok(Json(states))
}

pub async fn create_state_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateStateRequest>,
) -> ApiResult<(StatusCode, Json<StateResponse>)> {
    let unit = StateUnit::new(payload.code, payload.name)?;
    let record = state
        .directory_service
        .create_state(user.subject(), unit)
        .await?;

    Ok((StatusCode::CREATED, Json(StateResponse::from(record))))
}

pub async fn update_state_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(code): Path<String>,
    Json(payload): Json<UpdateStateRequest>,
) -> ApiResult<Json<StateResponse>> {
    let record = state
        .directory_service
        .update_state(user.subject(), &code, &payload.name)
        .await?;

    Ok(Json(StateResponse::from(record)))
}

pub async fn delete_state_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(code): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .directory_service
        .delete_state(user.subject(), &code)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DistrictListQuery {
    pub state_code: Option<String>,
}

pub async fn list_districts_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<DistrictListQuery>,
) -> ApiResult<Json<Vec<DistrictResponse>>> {
    let districts = state
        .directory_service
        .list_districts(user.subject(), query.state_code.as_deref())
        .await?
        .into_iter()
        .map(DistrictResponse::from)
        .collect();

    Ok(Json(districts))
}

pub async fn create_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateDistrictRequest>,
) -> ApiResult<(StatusCode, Json<DistrictResponse>)> {
    let district = District::new(payload.name, payload.state_code)?;
    let record = state
        .directory_service
        .create_district(user.subject(), district)
        .await?;

    Ok((StatusCode::CREATED, Json(DistrictResponse::from(record))))
}

pub async fn update_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    Json(payload): Json<CreateDistrictRequest>,
) -> ApiResult<Json<DistrictResponse>> {
    let id = parse_uuid(&id, "district")?;
    let district = District::new(payload.name, payload.state_code)?;
    let record = state
        .directory_service
        .update_district(user.subject(), id, district)
        .await?;

    Ok(Json(DistrictResponse::from(record)))
}

pub async fn delete_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id, "district")?;
    state
        .directory_service
        .delete_district(user.subject(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DivisionListQuery {
    pub district_id: Option<String>,
}

pub async fn list_divisions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<DivisionListQuery>,
) -> ApiResult<Json<Vec<DivisionResponse>>> {
    let district_id = query
        .district_id
        .as_deref()
        .map(|value| parse_uuid(value, "district"))
        .transpose()?;

    let divisions = state
        .directory_service
        .list_divisions(user.subject(), district_id)
        .await?
        .into_iter()
        .map(DivisionResponse::from)
        .collect();

    Ok(Json(divisions))
}

pub async fn create_division_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveDivisionRequest>,
) -> ApiResult<(StatusCode, Json<DivisionResponse>)> {
    let district_id = parse_uuid(&payload.district_id, "district")?;
    let division = Division::new(payload.name, district_id)?;
    let record = state
        .directory_service
        .create_division(user.subject(), division)
        .await?;

    Ok((StatusCode::CREATED, Json(DivisionResponse::from(record))))
}

pub async fn update_division_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    Json(payload): Json<SaveDivisionRequest>,
) -> ApiResult<Json<DivisionResponse>> {
    let id = parse_uuid(&id, "division")?;
    let district_id = parse_uuid(&payload.district_id, "district")?;
    let division = Division::new(payload.name, district_id)?;
    let record = state
        .directory_service
        .update_division(user.subject(), id, division)
        .await?;

    Ok(Json(DivisionResponse::from(record)))
}

pub async fn delete_division_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id, "division")?;
    state
        .directory_service
        .delete_division(user.subject(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct BoothListQuery {
    pub division_id: Option<String>,
}

pub async fn list_booths_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<BoothListQuery>,
) -> ApiResult<Json<Vec<BoothResponse>>> {
    let division_id = query
        .division_id
        .as_deref()
        .map(|value| parse_uuid(value, "division"))
        .transpose()?;

    let booths = state
        .directory_service
        .list_booths(user.subject(), division_id)
        .await?
        .into_iter()
        .map(BoothResponse::from)
        .collect();

    Ok(Json(booths))
}

pub async fn create_booth_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveBoothRequest>,
) -> ApiResult<(StatusCode, Json<BoothResponse>)> {
    let division_id = parse_uuid(&payload.division_id, "division")?;
    let booth = Booth::new(payload.number, payload.name, division_id)?;
    let record = state
        .directory_service
        .create_booth(user.subject(), booth)
        .await?;

    Ok((StatusCode::CREATED, Json(BoothResponse::from(record))))
}

pub async fn update_booth_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    Json(payload): Json<SaveBoothRequest>,
) -> ApiResult<Json<BoothResponse>> {
    let id = parse_uuid(&id, "booth")?;
    let division_id = parse_uuid(&payload.division_id, "division")?;
    let booth = Booth::new(payload.number, payload.name, division_id)?;
    let record = state
        .directory_service
        .update_booth(user.subject(), id, booth)
        .await?;

    Ok(Json(BoothResponse::from(record)))
}

pub async fn delete_booth_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id, "booth")?;
    state
        .directory_service
        .delete_booth(user.subject(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
