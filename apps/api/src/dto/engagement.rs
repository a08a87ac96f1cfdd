use sangathan_application::{OrgEventRecord, SamitiRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Samiti committee projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/samiti-response.ts"
)]
pub struct SamitiResponse {
    pub id: String,
    pub name: String,
    pub level: String,
    pub unit_name: String,
    pub description: Option<String>,
}

impl From<SamitiRecord> for SamitiResponse {
    fn from(record: SamitiRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.samiti.name().to_owned(),
            level: record.samiti.level().as_str().to_owned(),
            unit_name: record.samiti.unit_name().to_owned(),
            description: record.samiti.description().map(ToOwned::to_owned),
        }
    }
}

/// Incoming payload for committee creation and updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/save-samiti-request.ts"
)]
pub struct SaveSamitiRequest {
    pub name: String,
    pub level: String,
    pub unit_name: String,
    pub description: Option<String>,
}

/// Organizational event projection; timestamps are RFC3339.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/event-response.ts"
)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub description: Option<String>,
}

impl From<OrgEventRecord> for EventResponse {
    fn from(record: OrgEventRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.event.title().to_owned(),
            venue: record.event.venue().map(ToOwned::to_owned),
            starts_at: record.event.starts_at().to_rfc3339(),
            ends_at: record.event.ends_at().map(|ends_at| ends_at.to_rfc3339()),
            description: record.event.description().map(ToOwned::to_owned),
        }
    }
}

/// Incoming payload for event creation and updates; timestamps are RFC3339.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/save-event-request.ts"
)]
pub struct SaveEventRequest {
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub description: Option<String>,
}
