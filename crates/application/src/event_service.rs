use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sangathan_core::AppResult;
use sangathan_domain::{AuditAction, OrgEvent, Permission};

use crate::{AuditEvent, AuditRepository, AuthorizationService};

/// Stored organizational event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgEventRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Validated event payload.
    pub event: OrgEvent,
}

/// Repository port for event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Lists all events ordered by start time.
    async fn list(&self) -> AppResult<Vec<OrgEventRecord>>;

    /// Inserts an event.
    async fn insert(&self, event: &OrgEvent) -> AppResult<OrgEventRecord>;

    /// Updates an event.
    async fn update(&self, id: Uuid, event: &OrgEvent) -> AppResult<OrgEventRecord>;

    /// Deletes an event.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for organizational events.
#[derive(Clone)]
pub struct EventService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn EventRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl EventService {
    /// Creates a new event service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn EventRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    /// Lists all events.
    pub async fn list(&self, actor_subject: &str) -> AppResult<Vec<OrgEventRecord>> {
        self.authorization_service
            .require_permission(actor_subject, Permission::EventRead)
            .await?;
        self.repository.list().await
    }

    /// Creates an event.
    pub async fn create(&self, actor_subject: &str, event: OrgEvent) -> AppResult<OrgEventRecord> {
        self.authorization_service
            .require_permission(actor_subject, Permission::EventWrite)
            .await?;

        let record = self.repository.insert(&event).await?;
        self.append_audit(actor_subject, AuditAction::EventCreated, record.id)
            .await?;
        Ok(record)
    }

    /// Updates an event.
    pub async fn update(
        &self,
        actor_subject: &str,
        id: Uuid,
        event: OrgEvent,
    ) -> AppResult<OrgEventRecord> {
        self.authorization_service
            .require_permission(actor_subject, Permission::EventWrite)
            .await?;

        let record = self.repository.update(id, &event).await?;
        self.append_audit(actor_subject, AuditAction::EventUpdated, record.id)
            .await?;
        Ok(record)
    }

    /// Deletes an event.
    pub async fn delete(&self, actor_subject: &str, id: Uuid) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor_subject, Permission::EventWrite)
            .await?;

        self.repository.delete(id).await?;
        self.append_audit(actor_subject, AuditAction::EventDeleted, id)
            .await
    }

    async fn append_audit(
        &self,
        actor_subject: &str,
        action: AuditAction,
        id: Uuid,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action,
                resource_type: "org_event".to_owned(),
                resource_id: id.to_string(),
                detail: None,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use sangathan_core::AppResult;
    use sangathan_domain::{OrgEvent, Permission, Role, SidebarAccess};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::{
        AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService,
    };

    use super::{EventRepository, EventService, OrgEventRecord};

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
    struct FakeEventRepository {
        events: Mutex<Vec<OrgEventRecord>>,
    }

    #[async_trait]
    impl EventRepository for FakeEventRepository {
        async fn list(&self) -> AppResult<Vec<OrgEventRecord>> {
            Ok(self.events.lock().await.clone())
        }

        async fn insert(&self, event: &OrgEvent) -> AppResult<OrgEventRecord> {
            let record = OrgEventRecord {
                id: Uuid::new_v4(),
                event: event.clone(),
            };
            self.events.lock().await.push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: Uuid, event: &OrgEvent) -> AppResult<OrgEventRecord> {
            let record = OrgEventRecord {
                id,
                event: event.clone(),
            };
            Ok(record)
        }

        async fn delete(&self, id: Uuid) -> AppResult<()> {
            self.events.lock().await.retain(|record| record.id != id);
            Ok(())
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

    fn service_for(actor: &str, permissions: Vec<Permission>) -> EventService {
        let role = Role::new("operator", permissions, SidebarAccess::from_entries([]))
            .unwrap_or_else(|_| unreachable!("valid role"));
        EventService::new(
            AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
                roles: HashMap::from([(actor.to_owned(), role)]),
            })),
            Arc::new(FakeEventRepository::default()),
            Arc::new(FakeAuditRepository::default()),
        )
    }

    #[tokio::test]
    async fn creation_requires_the_write_permission() {
        let service = service_for("viewer", vec![Permission::EventRead]);
        let event = OrgEvent::new("Rally", None, Utc::now(), None, None)
            .unwrap_or_else(|_| unreachable!("valid event"));

        let result = service.create("viewer", event).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn read_permission_admits_listing() {
        let service = service_for("viewer", vec![Permission::EventRead]);

        let result = service.list("viewer").await;
        assert!(result.is_ok());
    }
}
