use sangathan_application::{BoothRecord, DistrictRecord, DivisionRecord, StateRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// State unit projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/state-response.ts"
)]
pub struct StateResponse {
    pub code: String,
    pub name: String,
}

impl From<StateRecord> for StateResponse {
    fn from(record: StateRecord) -> Self {
        Self {
            code: record.code,
            name: record.name,
        }
    }
}

/// Incoming payload for state creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/create-state-request.ts"
)]
pub struct CreateStateRequest {
    pub code: String,
    pub name: String,
}

/// Incoming payload for state renames.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/update-state-request.ts"
)]
pub struct UpdateStateRequest {
    pub name: String,
}

/// District projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/district-response.ts"
)]
pub struct DistrictResponse {
    pub id: String,
    pub name: String,
    pub state_code: String,
}

impl From<DistrictRecord> for DistrictResponse {
    fn from(record: DistrictRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            state_code: record.state_code,
        }
    }
}

/// Incoming payload for district creation and updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/create-district-request.ts"
)]
pub struct CreateDistrictRequest {
    pub name: String,
    pub state_code: String,
}

/// Division projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/division-response.ts"
)]
pub struct DivisionResponse {
    pub id: String,
    pub name: String,
    pub district_id: String,
}

impl From<DivisionRecord> for DivisionResponse {
    fn from(record: DivisionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            district_id: record.district_id.to_string(),
        }
    }
}

/// Incoming payload for division creation and updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/save-division-request.ts"
)]
pub struct SaveDivisionRequest {
    pub name: String,
    pub district_id: String,
}

/// Booth projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/booth-response.ts"
)]
pub struct BoothResponse {
    pub id: String,
    pub number: i32,
    pub name: String,
    pub division_id: String,
}

impl From<BoothRecord> for BoothResponse {
    fn from(record: BoothRecord) -> Self {
        Self {
            id: record.id.to_string(),
            number: record.number,
            name: record.name,
            division_id: record.division_id.to_string(),
        }
    }
}

/// Incoming payload for booth creation and updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/save-booth-request.ts"
)]
pub struct SaveBoothRequest {
    pub number: i32,
    pub name: String,
    pub division_id: String,
}
