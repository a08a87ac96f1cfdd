use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sangathan_core::{AppError, AppResult};
use sangathan_domain::{Permission, Role, SidebarAccess};
use tokio::sync::Mutex;

use crate::security_admin_ports::{
    AuditLogEntry, AuditLogRepository, CreateRoleInput, RoleAssignment, RoleDefinition,
    SecurityAdminRepository,
};
use crate::{
    AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService,
    SessionSnapshotService,
};

use super::SecurityAdminService;

struct FakeAuthorizationRepository {
    roles: HashMap<String, Role>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn find_role_for_subject(&self, subject: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.get(subject).cloned())
    }
}

#[derive(Default)]
struct FakeSecurityAdminRepository {
    roles: Mutex<Vec<RoleDefinition>>,
    assignments: Mutex<Vec<RoleAssignment>>,
}

#[async_trait]
impl SecurityAdminRepository for FakeSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.lock().await;
        if roles.iter().any(|role| role.name == input.name) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        let role = RoleDefinition {
            role_id: format!("role-{}", roles.len() + 1),
            name: input.name,
            is_system: false,
            permissions: input.permissions,
            sidebar_paths: input.sidebar_paths,
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn assign_role_to_subject(&self, subject: &str, role_name: &str) -> AppResult<()> {
        let mut assignments = self.assignments.lock().await;
        assignments.retain(|assignment| assignment.subject != subject);
        assignments.push(RoleAssignment {
            subject: subject.to_owned(),
            role_id: role_name.to_owned(),
            role_name: role_name.to_owned(),
            assigned_at: "2026-01-01T00:00:00Z".to_owned(),
        });
        Ok(())
    }

    async fn remove_role_from_subject(&self, subject: &str, role_name: &str) -> AppResult<()> {
        self.assignments
            .lock()
            .await
            .retain(|assignment| {
                assignment.subject != subject || assignment.role_name != role_name
            });
        Ok(())
    }

    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        Ok(self.assignments.lock().await.clone())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct FakeAuditLogRepository;

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn list_entries(&self, _limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        Ok(Vec::new())
    }
}

struct Harness {
    service: SecurityAdminService,
    audit_repository: Arc<FakeAuditRepository>,
}

fn harness_with_actor(actor: &str, permissions: Vec<Permission>) -> Harness {
    let role = Role::new("operator", permissions, SidebarAccess::from_entries([]))
        .unwrap_or_else(|_| unreachable!("valid role"));
    let authorization_repository = Arc::new(FakeAuthorizationRepository {
        roles: HashMap::from([(actor.to_owned(), role)]),
    });
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = SecurityAdminService::new(
        AuthorizationService::new(authorization_repository.clone()),
        Arc::new(FakeSecurityAdminRepository::default()),
        Arc::new(FakeAuditLogRepository),
        audit_repository.clone(),
        SessionSnapshotService::new(authorization_repository),
    );

    Harness {
        service,
        audit_repository,
    }
}

#[tokio::test]
async fn role_creation_requires_the_manage_permission() {
    let harness = harness_with_actor("viewer", vec![Permission::DashboardView]);

    let result = harness
        .service
        .create_role(
            "viewer",
            CreateRoleInput {
                name: "organizer".to_owned(),
                permissions: vec![Permission::EventRead],
                sidebar_paths: vec!["/events".to_owned()],
            },
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn role_creation_emits_an_audit_event() {
    let harness = harness_with_actor("admin", vec![Permission::RoleManage]);

    let result = harness
        .service
        .create_role(
            "admin",
            CreateRoleInput {
                name: "organizer".to_owned(),
                permissions: vec![Permission::EventRead, Permission::EventWrite],
                sidebar_paths: vec!["/events".to_owned()],
            },
        )
        .await;
    assert!(result.is_ok());

    let events = harness.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn the_superadmin_role_name_is_reserved() {
    let harness = harness_with_actor("admin", vec![Permission::RoleManage]);

    let result = harness
        .service
        .create_role(
            "admin",
            CreateRoleInput {
                name: "superadmin".to_owned(),
                permissions: Vec::new(),
                sidebar_paths: Vec::new(),
            },
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn assignment_and_removal_are_audited() {
    let harness = harness_with_actor("admin", vec![Permission::RoleManage]);

    let assigned = harness
        .service
        .assign_role("admin", "subject-1", "organizer")
        .await;
    assert!(assigned.is_ok());

    let removed = harness
        .service
        .unassign_role("admin", "subject-1", "organizer")
        .await;
    assert!(removed.is_ok());

    let events = harness.audit_repository.events.lock().await;
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn audit_log_reads_require_their_own_permission() {
    let harness = harness_with_actor("admin", vec![Permission::RoleManage]);

    let denied = harness.service.list_audit_log("admin", 50).await;
    assert!(denied.is_err());

    let harness = harness_with_actor("auditor", vec![Permission::AuditRead]);
    let allowed = harness.service.list_audit_log("auditor", 50).await;
    assert!(allowed.is_ok());
}
