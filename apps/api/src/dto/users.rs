use sangathan_application::UserRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for administrator-driven account creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    /// Role assigned to the new account, if any.
    pub role_name: Option<String>,
}

/// User account projection. Never exposes the password hash.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub locked: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        let locked = record
            .locked_until
            .is_some_and(|locked_until| locked_until > chrono::Utc::now());

        Self {
            id: record.id.to_string(),
            email: record.email,
            display_name: record.display_name,
            locked,
        }
    }
}
