use sangathan_application::{AuditLogEntry, RoleAssignment, RoleDefinition};
use sangathan_domain::Permission;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role definition projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub is_system: bool,
    pub permissions: Vec<String>,
    pub sidebar_paths: Vec<String>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(role: RoleDefinition) -> Self {
        Self {
            role_id: role.role_id,
            name: role.name,
            is_system: role.is_system,
            permissions: role
                .permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            sidebar_paths: role.sidebar_paths,
        }
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub permissions: Vec<String>,
    pub sidebar_paths: Vec<String>,
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub subject: String,
    pub role_name: String,
}

/// Incoming payload for removing a role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/remove-role-assignment-request.ts"
)]
pub struct RemoveRoleAssignmentRequest {
    pub subject: String,
    pub role_name: String,
}

/// Role assignment projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub subject: String,
    pub role_id: String,
    pub role_name: String,
    pub assigned_at: String,
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(assignment: RoleAssignment) -> Self {
        Self {
            subject: assignment.subject,
            role_id: assignment.role_id,
            role_name: assignment.role_name,
            assigned_at: assignment.assigned_at,
        }
    }
}

/// Audit log entry projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub entry_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub recorded_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            subject: entry.subject,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            detail: entry.detail,
            recorded_at: entry.recorded_at,
        }
    }
}

/// Catalog entry shown in the role editor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/permission-info-response.ts"
)]
pub struct PermissionInfoResponse {
    pub name: String,
    pub category: String,
}

impl From<Permission> for PermissionInfoResponse {
    fn from(permission: Permission) -> Self {
        Self {
            name: permission.as_str().to_owned(),
            category: permission.category().as_str().to_owned(),
        }
    }
}
