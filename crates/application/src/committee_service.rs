use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sangathan_core::AppResult;
use sangathan_domain::{AuditAction, Permission, Samiti};

use crate::{AuditEvent, AuditRepository, AuthorizationService};

/// Stored samiti committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamitiRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Validated committee payload.
    pub samiti: Samiti,
}

/// Repository port for committee persistence.
#[async_trait]
pub trait CommitteeRepository: Send + Sync {
    /// Lists all committees ordered by name.
    async fn list(&self) -> AppResult<Vec<SamitiRecord>>;

    /// Inserts a committee.
    async fn insert(&self, samiti: &Samiti) -> AppResult<SamitiRecord>;

    /// Updates a committee.
    async fn update(&self, id: Uuid, samiti: &Samiti) -> AppResult<SamitiRecord>;

    /// Deletes a committee.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for samiti committees.
#[derive(Clone)]
pub struct CommitteeService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn CommitteeRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl CommitteeService {
    /// Creates a new committee service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn CommitteeRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    /// Lists all committees.
    pub async fn list(&self, actor_subject: &str) -> AppResult<Vec<SamitiRecord>> {
        self.authorization_service
            .require_permission(actor_subject, Permission::CommitteeRead)
            .await?;
        self.repository.list().await
    }

    /// Creates a committee.
    pub async fn create(&self, actor_subject: &str, samiti: Samiti) -> AppResult<SamitiRecord> {
        self.authorization_service
            .require_permission(actor_subject, Permission::CommitteeWrite)
            .await?;

        let record = self.repository.insert(&samiti).await?;
        self.append_audit(actor_subject, AuditAction::CommitteeCreated, record.id)
            .await?;
        Ok(record)
    }

    /// Updates a committee.
    pub async fn update(
        &self,
        actor_subject: &str,
        id: Uuid,
        samiti: Samiti,
    ) -> AppResult<SamitiRecord> {
        self.authorization_service
            .require_permission(actor_subject, Permission::CommitteeWrite)
            .await?;

        let record = self.repository.update(id, &samiti).await?;
        self.append_audit(actor_subject, AuditAction::CommitteeUpdated, record.id)
            .await?;
        Ok(record)
    }

    /// Deletes a committee.
    pub async fn delete(&self, actor_subject: &str, id: Uuid) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor_subject, Permission::CommitteeWrite)
            .await?;

        self.repository.delete(id).await?;
        self.append_audit(actor_subject, AuditAction::CommitteeDeleted, id)
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
                resource_type: "samiti".to_owned(),
                resource_id: id.to_string(),
                detail: None,
            })
            .await
    }
}
