use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth status response for the login flow.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub status: String,
}
