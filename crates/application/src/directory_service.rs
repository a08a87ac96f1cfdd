//! Geographic directory use-cases.
//!
//! Reads require the unit's read permission; writes require the write
//! permission, append an audit event, and validate parent references.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sangathan_core::{AppError, AppResult};
use sangathan_domain::{AuditAction, Booth, District, Division, Permission, StateUnit};

use crate::{AuditEvent, AuditRepository, AuthorizationService};

#[cfg(test)]
mod tests;

/// Stored state unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord {
    /// Stable uppercase state code.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Stored district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Parent state code.
    pub state_code: String,
}

/// Stored division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Parent district identifier.
    pub district_id: Uuid,
}

/// Stored polling booth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Booth number unique within its division.
    pub number: i32,
    /// Display name.
    pub name: String,
    /// Parent division identifier.
    pub division_id: Uuid,
}

/// Repository port for directory persistence.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Lists all state units ordered by code.
    async fn list_states(&self) -> AppResult<Vec<StateRecord>>;

    /// Finds a state by code.
    async fn find_state(&self, code: &str) -> AppResult<Option<StateRecord>>;

    /// Inserts a state unit.
    async fn insert_state(&self, state: &StateUnit) -> AppResult<StateRecord>;

    /// Updates a state's display name.
    async fn update_state(&self, code: &str, name: &str) -> AppResult<StateRecord>;

    /// Deletes a state. Fails with a conflict while districts reference it.
    async fn delete_state(&self, code: &str) -> AppResult<()>;

    /// Lists districts, optionally scoped to one state.
    async fn list_districts(&self, state_code: Option<&str>) -> AppResult<Vec<DistrictRecord>>;

    /// Finds a district by identifier.
    async fn find_district(&self, id: Uuid) -> AppResult<Option<DistrictRecord>>;

    /// Inserts a district.
    async fn insert_district(&self, district: &District) -> AppResult<DistrictRecord>;

    /// Updates a district.
    async fn update_district(&self, id: Uuid, district: &District) -> AppResult<DistrictRecord>;

    /// Deletes a district. Fails with a conflict while divisions reference it.
    async fn delete_district(&self, id: Uuid) -> AppResult<()>;

    /// Lists divisions, optionally scoped to one district.
    async fn list_divisions(&self, district_id: Option<Uuid>) -> AppResult<Vec<DivisionRecord>>;

    /// Finds a division by identifier.
    async fn find_division(&self, id: Uuid) -> AppResult<Option<DivisionRecord>>;

    /// Inserts a division.
    async fn insert_division(&self, division: &Division) -> AppResult<DivisionRecord>;

    /// Updates a division.
    async fn update_division(&self, id: Uuid, division: &Division) -> AppResult<DivisionRecord>;

    /// Deletes a division. Fails with a conflict while booths reference it.
    async fn delete_division(&self, id: Uuid) -> AppResult<()>;

    /// Lists booths, optionally scoped to one division.
    async fn list_booths(&self, division_id: Option<Uuid>) -> AppResult<Vec<BoothRecord>>;

    /// Inserts a booth.
    async fn insert_booth(&self, booth: &Booth) -> AppResult<BoothRecord>;

    /// Updates a booth.
    async fn update_booth(&self, id: Uuid, booth: &Booth) -> AppResult<BoothRecord>;

    /// Deletes a booth.
    async fn delete_booth(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for the geographic directory.
#[derive(Clone)]
pub struct DirectoryService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn DirectoryRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl DirectoryService {
    /// Creates a new directory service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn DirectoryRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    /// Lists all state units.
    pub async fn list_states(&self, actor_subject: &str) -> AppResult<Vec<StateRecord>> {
        self.require(actor_subject, Permission::StateRead).await?;
        self.repository.list_states().await
    }

    /// Creates a state unit.
    pub async fn create_state(
        &self,
        actor_subject: &str,
        state: StateUnit,
    ) -> AppResult<StateRecord> {
        self.require(actor_subject, Permission::StateWrite).await?;

        let record = self.repository.insert_state(&state).await?;
        self.audit_created(actor_subject, "state", &record.code).await?;
        Ok(record)
    }

    /// Renames a state unit.
    pub async fn update_state(
        &self,
        actor_subject: &str,
        code: &str,
        name: &str,
    ) -> AppResult<StateRecord> {
        self.require(actor_subject, Permission::StateWrite).await?;

        // Re-validate through the domain type so renames obey the same rules.
        let state = StateUnit::new(code, name)?;
        let record = self
            .repository
            .update_state(state.code(), state.name())
            .await?;
        self.audit_updated(actor_subject, "state", &record.code).await?;
        Ok(record)
    }

    /// Deletes a state unit.
    pub async fn delete_state(&self, actor_subject: &str, code: &str) -> AppResult<()> {
        self.require(actor_subject, Permission::StateWrite).await?;

        self.repository.delete_state(code).await?;
        self.audit_deleted(actor_subject, "state", code).await
    }

    /// Lists districts, optionally scoped to one state.
    pub async fn list_districts(
        &self,
        actor_subject: &str,
        state_code: Option<&str>,
    ) -> AppResult<Vec<DistrictRecord>> {
        self.require(actor_subject, Permission::DistrictRead).await?;
        self.repository.list_districts(state_code).await
    }

    /// Creates a district under an existing state.
    pub async fn create_district(
        &self,
        actor_subject: &str,
        district: District,
    ) -> AppResult<DistrictRecord> {
        self.require(actor_subject, Permission::DistrictWrite).await?;

        if self.repository.find_state(district.state_code()).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "state '{}' does not exist",
                district.state_code()
            )));
        }

        let record = self.repository.insert_district(&district).await?;
        self.audit_created(actor_subject, "district", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Updates a district.
    pub async fn update_district(
        &self,
        actor_subject: &str,
        id: Uuid,
        district: District,
    ) -> AppResult<DistrictRecord> {
        self.require(actor_subject, Permission::DistrictWrite).await?;

        if self.repository.find_state(district.state_code()).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "state '{}' does not exist",
                district.state_code()
            )));
        }

        let record = self.repository.update_district(id, &district).await?;
        self.audit_updated(actor_subject, "district", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Deletes a district.
    pub async fn delete_district(&self, actor_subject: &str, id: Uuid) -> AppResult<()> {
        self.require(actor_subject, Permission::DistrictWrite).await?;

        self.repository.delete_district(id).await?;
        self.audit_deleted(actor_subject, "district", &id.to_string())
            .await
    }

    /// Lists divisions, optionally scoped to one district.
    pub async fn list_divisions(
        &self,
        actor_subject: &str,
        district_id: Option<Uuid>,
    ) -> AppResult<Vec<DivisionRecord>> {
        self.require(actor_subject, Permission::DivisionRead).await?;
        self.repository.list_divisions(district_id).await
    }

    /// Creates a division under an existing district.
    pub async fn create_division(
        &self,
        actor_subject: &str,
        division: Division,
    ) -> AppResult<DivisionRecord> {
        self.require(actor_subject, Permission::DivisionWrite).await?;

        if self
            .repository
            .find_district(division.district_id())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "district '{}' does not exist",
                division.district_id()
            )));
        }

        let record = self.repository.insert_division(&division).await?;
        self.audit_created(actor_subject, "division", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Updates a division.
    pub async fn update_division(
        &self,
        actor_subject: &str,
        id: Uuid,
        division: Division,
    ) -> AppResult<DivisionRecord> {
        self.require(actor_subject, Permission::DivisionWrite).await?;

        let record = self.repository.update_division(id, &division).await?;
        self.audit_updated(actor_subject, "division", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Deletes a division.
    pub async fn delete_division(&self, actor_subject: &str, id: Uuid) -> AppResult<()> {
        self.require(actor_subject, Permission::DivisionWrite).await?;

        self.repository.delete_division(id).await?;
        self.audit_deleted(actor_subject, "division", &id.to_string())
            .await
    }

    /// Lists booths, optionally scoped to one division.
    pub async fn list_booths(
        &self,
        actor_subject: &str,
        division_id: Option<Uuid>,
    ) -> AppResult<Vec<BoothRecord>> {
        self.require(actor_subject, Permission::BoothRead).await?;
        self.repository.list_booths(division_id).await
    }

    /// Creates a booth under an existing division.
    pub async fn create_booth(
        &self,
        actor_subject: &str,
        booth: Booth,
    ) -> AppResult<BoothRecord> {
        self.require(actor_subject, Permission::BoothWrite).await?;

        if self
            .repository
            .find_division(booth.division_id())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "division '{}' does not exist",
                booth.division_id()
            )));
        }

        let record = self.repository.insert_booth(&booth).await?;
        self.audit_created(actor_subject, "booth", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Updates a booth.
    pub async fn update_booth(
        &self,
        actor_subject: &str,
        id: Uuid,
        booth: Booth,
    ) -> AppResult<BoothRecord> {
        self.require(actor_subject, Permission::BoothWrite).await?;

        let record = self.repository.update_booth(id, &booth).await?;
        self.audit_updated(actor_subject, "booth", &record.id.to_string())
            .await?;
        Ok(record)
    }

    /// Deletes a booth.
    pub async fn delete_booth(&self, actor_subject: &str, id: Uuid) -> AppResult<()> {
        self.require(actor_subject, Permission::BoothWrite).await?;

        self.repository.delete_booth(id).await?;
        self.audit_deleted(actor_subject, "booth", &id.to_string()).await
    }

    async fn require(&self, actor_subject: &str, permission: Permission) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor_subject, permission)
            .await
    }

    async fn audit_created(
        &self,
        actor_subject: &str,
        unit: &str,
        resource_id: &str,
    ) -> AppResult<()> {
        self.append_audit(
            actor_subject,
            AuditAction::DirectoryUnitCreated,
            unit,
            resource_id,
        )
        .await
    }

    async fn audit_updated(
        &self,
        actor_subject: &str,
        unit: &str,
        resource_id: &str,
    ) -> AppResult<()> {
        self.append_audit(
            actor_subject,
            AuditAction::DirectoryUnitUpdated,
            unit,
            resource_id,
        )
        .await
    }

    async fn audit_deleted(
        &self,
        actor_subject: &str,
        unit: &str,
        resource_id: &str,
    ) -> AppResult<()> {
        self.append_audit(
            actor_subject,
            AuditAction::DirectoryUnitDeleted,
            unit,
            resource_id,
        )
        .await
    }

    async fn append_audit(
        &self,
        actor_subject: &str,
        action: AuditAction,
        unit: &str,
        resource_id: &str,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action,
                resource_type: format!("directory_{unit}"),
                resource_id: resource_id.to_owned(),
                detail: None,
            })
            .await
    }
}
