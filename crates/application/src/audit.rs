use async_trait::async_trait;

use sangathan_core::AppResult;
use sangathan_domain::AuditAction;

/// Audit event appended by application use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Subject that performed the action.
    pub subject: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional free-form detail.
    pub detail: Option<String>,
}

/// Repository port for audit event persistence.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends an audit event entry.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
