use async_trait::async_trait;

use sangathan_core::AppResult;
use sangathan_domain::Permission;

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: String,
    /// Unique role name.
    pub name: String,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Effective role grants.
    pub permissions: Vec<Permission>,
    /// Sidebar allow-list entries, `"*"` meaning every path.
    pub sidebar_paths: Vec<String>,
}

/// Assignment projection mapping a subject to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Subject identifier.
    pub subject: String,
    /// Role identifier.
    pub role_id: String,
    /// Role name.
    pub role_name: String,
    /// Assignment timestamp in RFC3339.
    pub assigned_at: String,
}

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Grants to attach to the role.
    pub permissions: Vec<Permission>,
    /// Sidebar allow-list entries, `"*"` meaning every path.
    pub sidebar_paths: Vec<String>,
}

/// Repository port for role administration.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists all role definitions.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Creates a custom role with its grants and sidebar entries.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition>;

    /// Assigns a role to a subject, replacing any existing assignment.
    async fn assign_role_to_subject(&self, subject: &str, role_name: &str) -> AppResult<()>;

    /// Removes a role assignment from a subject.
    async fn remove_role_from_subject(&self, subject: &str, role_name: &str) -> AppResult<()>;

    /// Lists all role assignments.
    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>>;
}

/// Audit log entry projection for administrative reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Stable entry identifier.
    pub entry_id: String,
    /// Subject that performed the action.
    pub subject: String,
    /// Stable action identifier.
    pub action: String,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional free-form detail.
    pub detail: Option<String>,
    /// Entry timestamp in RFC3339.
    pub recorded_at: String,
}

/// Repository port for reading the audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists the most recent audit entries, newest first.
    async fn list_entries(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>>;
}
