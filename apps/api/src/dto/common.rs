use sangathan_core::UserIdentity;
use sangathan_domain::{EffectiveRole, Permission};
use serde::Serialize;
use ts_rs::TS;

/// Generic human-readable message payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/generic-message-response.ts"
)]
pub struct GenericMessageResponse {
    pub message: String,
}

/// Health probe payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: String,
}

/// Identity plus resolved access, returned by `/auth/me` and `/auth/refresh`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role_name: Option<String>,
    pub is_superadmin: bool,
    pub permissions: Vec<String>,
    pub sidebar_paths: Vec<String>,
}

impl UserIdentityResponse {
    /// Builds the response from a session identity and its resolved role.
    pub fn from_identity_with_role(
        identity: UserIdentity,
        role: Option<EffectiveRole>,
    ) -> Self {
        let (role_name, is_superadmin, permissions, sidebar_paths) = match role {
            Some(EffectiveRole::Superadmin) => (
                Some(sangathan_domain::SUPERADMIN_ROLE_NAME.to_owned()),
                true,
                Permission::all()
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect(),
                vec!["*".to_owned()],
            ),
            Some(EffectiveRole::Standard(role)) => (
                Some(role.name().to_owned()),
                false,
                role.permissions()
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect(),
                role.sidebar().entries(),
            ),
            None => (None, false, Vec::new(), Vec::new()),
        };

        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role_name,
            is_superadmin,
            permissions,
            sidebar_paths,
        }
    }
}
