mod auth;
mod common;
mod directory;
mod engagement;
mod navigation;
mod security;
mod users;

pub use auth::{AuthLoginRequest, AuthLoginResponse};
pub use common::{GenericMessageResponse, HealthResponse, UserIdentityResponse};
pub use directory::{
    BoothResponse, CreateDistrictRequest, CreateStateRequest, DistrictResponse,
    DivisionResponse, SaveBoothRequest, SaveDivisionRequest, StateResponse,
    UpdateStateRequest,
};
pub use engagement::{EventResponse, SamitiResponse, SaveEventRequest, SaveSamitiRequest};
pub use navigation::MenuItemResponse;
pub use security::{
    AssignRoleRequest, AuditLogEntryResponse, CreateRoleRequest, PermissionInfoResponse,
    RemoveRoleAssignmentRequest, RoleAssignmentResponse, RoleResponse,
};
pub use users::{CreateUserRequest, UserResponse};

#[cfg(test)]
mod tests {
    use super::{
        AssignRoleRequest, AuditLogEntryResponse, AuthLoginRequest, AuthLoginResponse,
        BoothResponse, CreateDistrictRequest, CreateRoleRequest, CreateStateRequest,
        CreateUserRequest, DistrictResponse, DivisionResponse, EventResponse,
        GenericMessageResponse, HealthResponse, MenuItemResponse, PermissionInfoResponse,
        RemoveRoleAssignmentRequest, RoleAssignmentResponse, RoleResponse, SamitiResponse,
        SaveBoothRequest, SaveDivisionRequest, SaveEventRequest, SaveSamitiRequest,
        StateResponse, UpdateStateRequest, UserIdentityResponse, UserResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AuthLoginRequest::export(&config)?;
        AuthLoginResponse::export(&config)?;
        GenericMessageResponse::export(&config)?;
        HealthResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;
        MenuItemResponse::export(&config)?;
        StateResponse::export(&config)?;
        CreateStateRequest::export(&config)?;
        UpdateStateRequest::export(&config)?;
        DistrictResponse::export(&config)?;
        CreateDistrictRequest::export(&config)?;
        DivisionResponse::export(&config)?;
        SaveDivisionRequest::export(&config)?;
        BoothResponse::export(&config)?;
        SaveBoothRequest::export(&config)?;
        SamitiResponse::export(&config)?;
        SaveSamitiRequest::export(&config)?;
        EventResponse::export(&config)?;
        SaveEventRequest::export(&config)?;
        RoleResponse::export(&config)?;
        CreateRoleRequest::export(&config)?;
        AssignRoleRequest::export(&config)?;
        RemoveRoleAssignmentRequest::export(&config)?;
        RoleAssignmentResponse::export(&config)?;
        AuditLogEntryResponse::export(&config)?;
        PermissionInfoResponse::export(&config)?;
        CreateUserRequest::export(&config)?;
        UserResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
