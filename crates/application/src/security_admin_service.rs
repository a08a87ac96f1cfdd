use std::sync::Arc;

use sangathan_core::{AppError, AppResult};
use sangathan_domain::{AuditAction, Permission, SUPERADMIN_ROLE_NAME};

use crate::security_admin_ports::{
    AuditLogEntry, AuditLogRepository, CreateRoleInput, RoleAssignment, RoleDefinition,
    SecurityAdminRepository,
};
use crate::{
    AuditEvent, AuditRepository, AuthorizationService, SessionSnapshotService,
};

#[cfg(test)]
mod tests;

/// Application service for role and audit administration.
///
/// Every operation requires the acting subject to hold the matching
/// administration permission. Mutations append audit events and invalidate
/// the affected subjects' cached snapshots.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    session_snapshots: SessionSnapshotService,
}

impl SecurityAdminService {
    /// Creates a new security administration service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        session_snapshots: SessionSnapshotService,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_log_repository,
            audit_repository,
            session_snapshots,
        }
    }

    /// Returns all role definitions for administrative users.
    pub async fn list_roles(&self, actor_subject: &str) -> AppResult<Vec<RoleDefinition>> {
        self.require_role_manage(actor_subject).await?;
        self.repository.list_roles().await
    }

    /// Returns the permission catalog grouped for the role editor.
    pub async fn list_permission_catalog(
        &self,
        actor_subject: &str,
    ) -> AppResult<&'static [Permission]> {
        self.require_role_manage(actor_subject).await?;
        Ok(Permission::all())
    }

    /// Creates a custom role and emits an audit event.
    pub async fn create_role(
        &self,
        actor_subject: &str,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require_role_manage(actor_subject).await?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("role name must not be empty".to_owned()));
        }
        if name == SUPERADMIN_ROLE_NAME {
            return Err(AppError::Conflict(format!(
                "role name '{SUPERADMIN_ROLE_NAME}' is reserved"
            )));
        }

        let role = self
            .repository
            .create_role(CreateRoleInput {
                name: name.to_owned(),
                permissions: input.permissions,
                sidebar_paths: input.sidebar_paths,
            })
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action: AuditAction::SecurityRoleCreated,
                resource_type: "rbac_role".to_owned(),
                resource_id: role.name.clone(),
                detail: Some(format!("created role '{}'", role.name)),
            })
            .await?;

        Ok(role)
    }

    /// Assigns a role to a subject and emits an audit event.
    pub async fn assign_role(
        &self,
        actor_subject: &str,
        subject: &str,
        role_name: &str,
    ) -> AppResult<()> {
        self.require_role_manage(actor_subject).await?;

        self.repository
            .assign_role_to_subject(subject, role_name)
            .await?;
        self.session_snapshots.invalidate(subject).await;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action: AuditAction::SecurityRoleAssigned,
                resource_type: "rbac_subject_role".to_owned(),
                resource_id: format!("{subject}:{role_name}"),
                detail: Some(format!("assigned role '{role_name}' to '{subject}'")),
            })
            .await
    }

    /// Assigns a role without checking the actor's permissions.
    ///
    /// Only for first-run bootstrap, where no subject can hold the
    /// role-manage permission yet. Still audited.
    pub async fn assign_role_bypassing_checks(
        &self,
        subject: &str,
        role_name: &str,
    ) -> AppResult<()> {
        self.repository
            .assign_role_to_subject(subject, role_name)
            .await?;
        self.session_snapshots.invalidate(subject).await;

        self.audit_repository
            .append_event(AuditEvent {
                subject: "bootstrap".to_owned(),
                action: AuditAction::SecurityRoleAssigned,
                resource_type: "rbac_subject_role".to_owned(),
                resource_id: format!("{subject}:{role_name}"),
                detail: Some(format!(
                    "assigned role '{role_name}' to '{subject}' during bootstrap"
                )),
            })
            .await
    }

    /// Removes a role assignment from a subject and emits an audit event.
    pub async fn unassign_role(
        &self,
        actor_subject: &str,
        subject: &str,
        role_name: &str,
    ) -> AppResult<()> {
        self.require_role_manage(actor_subject).await?;

        self.repository
            .remove_role_from_subject(subject, role_name)
            .await?;
        self.session_snapshots.invalidate(subject).await;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action: AuditAction::SecurityRoleUnassigned,
                resource_type: "rbac_subject_role".to_owned(),
                resource_id: format!("{subject}:{role_name}"),
                detail: Some(format!("removed role '{role_name}' from '{subject}'")),
            })
            .await
    }

    /// Returns role assignments for administrative users.
    pub async fn list_role_assignments(
        &self,
        actor_subject: &str,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.require_role_manage(actor_subject).await?;
        self.repository.list_role_assignments().await
    }

    /// Returns recent audit log entries, newest first.
    pub async fn list_audit_log(
        &self,
        actor_subject: &str,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service
            .require_permission(actor_subject, Permission::AuditRead)
            .await?;
        self.audit_log_repository.list_entries(limit.clamp(1, 500)).await
    }

    async fn require_role_manage(&self, actor_subject: &str) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor_subject, Permission::RoleManage)
            .await
    }
}
