use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sangathan_core::{AppError, AppResult};
use sangathan_domain::{Booth, District, Division, Permission, Role, SidebarAccess, StateUnit};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService,
};

use super::{
    BoothRecord, DirectoryRepository, DirectoryService, DistrictRecord, DivisionRecord,
    StateRecord,
};

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
struct FakeDirectoryRepository {
    states: Mutex<Vec<StateRecord>>,
    districts: Mutex<Vec<DistrictRecord>>,
    divisions: Mutex<Vec<DivisionRecord>>,
    booths: Mutex<Vec<BoothRecord>>,
}

#[async_trait]
impl DirectoryRepository for FakeDirectoryRepository {
    async fn list_states(&self) -> AppResult<Vec<StateRecord>> {
        Ok(self.states.lock().await.clone())
    }

    async fn find_state(&self, code: &str) -> AppResult<Option<StateRecord>> {
        Ok(self
            .states
            .lock()
            .await
            .iter()
            .find(|state| state.code == code)
            .cloned())
    }

    async fn insert_state(&self, state: &StateUnit) -> AppResult<StateRecord> {
        let record = StateRecord {
            code: state.code().to_owned(),
            name: state.name().to_owned(),
        };
        self.states.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_state(&self, code: &str, name: &str) -> AppResult<StateRecord> {
        let mut states = self.states.lock().await;
        let state = states
            .iter_mut()
            .find(|state| state.code == code)
            .ok_or_else(|| AppError::NotFound(format!("state '{code}' does not exist")))?;
        state.name = name.to_owned();
        Ok(state.clone())
    }

    async fn delete_state(&self, code: &str) -> AppResult<()> {
        self.states.lock().await.retain(|state| state.code != code);
        Ok(())
    }

    async fn list_districts(&self, state_code: Option<&str>) -> AppResult<Vec<DistrictRecord>> {
        Ok(self
            .districts
            .lock()
            .await
            .iter()
            .filter(|district| {
                state_code.is_none_or(|code| district.state_code == code)
            })
            .cloned()
            .collect())
    }

    async fn find_district(&self, id: Uuid) -> AppResult<Option<DistrictRecord>> {
        Ok(self
            .districts
            .lock()
            .await
            .iter()
            .find(|district| district.id == id)
            .cloned())
    }

    async fn insert_district(&self, district: &District) -> AppResult<DistrictRecord> {
        let record = DistrictRecord {
            id: Uuid::new_v4(),
            name: district.name().to_owned(),
            state_code: district.state_code().to_owned(),
        };
        self.districts.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_district(
        &self,
        id: Uuid,
        district: &District,
    ) -> AppResult<DistrictRecord> {
        let mut districts = self.districts.lock().await;
        let record = districts
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("district '{id}' does not exist")))?;
        record.name = district.name().to_owned();
        record.state_code = district.state_code().to_owned();
        Ok(record.clone())
    }

    async fn delete_district(&self, id: Uuid) -> AppResult<()> {
        self.districts.lock().await.retain(|record| record.id != id);
        Ok(())
    }

    async fn list_divisions(
        &self,
        district_id: Option<Uuid>,
    ) -> AppResult<Vec<DivisionRecord>> {
        Ok(self
            .divisions
            .lock()
            .await
            .iter()
            .filter(|division| district_id.is_none_or(|id| division.district_id == id))
            .cloned()
            .collect())
    }

    async fn find_division(&self, id: Uuid) -> AppResult<Option<DivisionRecord>> {
        Ok(self
            .divisions
            .lock()
            .await
            .iter()
            .find(|division| division.id == id)
            .cloned())
    }

    async fn insert_division(&self, division: &Division) -> AppResult<DivisionRecord> {
        let record = DivisionRecord {
            id: Uuid::new_v4(),
            name: division.name().to_owned(),
            district_id: division.district_id(),
        };
        self.divisions.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_division(
        &self,
        id: Uuid,
        division: &Division,
    ) -> AppResult<DivisionRecord> {
        let mut divisions = self.divisions.lock().await;
        let record = divisions
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("division '{id}' does not exist")))?;
        record.name = division.name().to_owned();
        Ok(record.clone())
    }

    async fn delete_division(&self, id: Uuid) -> AppResult<()> {
        self.divisions.lock().await.retain(|record| record.id != id);
        Ok(())
    }

    async fn list_booths(&self, division_id: Option<Uuid>) -> AppResult<Vec<BoothRecord>> {
        Ok(self
            .booths
            .lock()
            .await
            .iter()
            .filter(|booth| division_id.is_none_or(|id| booth.division_id == id))
            .cloned()
            .collect())
    }

    async fn insert_booth(&self, booth: &Booth) -> AppResult<BoothRecord> {
        let record = BoothRecord {
            id: Uuid::new_v4(),
            number: booth.number(),
            name: booth.name().to_owned(),
            division_id: booth.division_id(),
        };
        self.booths.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_booth(&self, id: Uuid, booth: &Booth) -> AppResult<BoothRecord> {
        let mut booths = self.booths.lock().await;
        let record = booths
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("booth '{id}' does not exist")))?;
        record.number = booth.number();
        record.name = booth.name().to_owned();
        Ok(record.clone())
    }

    async fn delete_booth(&self, id: Uuid) -> AppResult<()> {
        self.booths.lock().await.retain(|record| record.id != id);
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

struct Harness {
    service: DirectoryService,
    audit_repository: Arc<FakeAuditRepository>,
}

fn harness_with_actor(actor: &str, permissions: Vec<Permission>) -> Harness {
    let role = Role::new("operator", permissions, SidebarAccess::from_entries([]))
        .unwrap_or_else(|_| unreachable!("valid role"));
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = DirectoryService::new(
        AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            roles: HashMap::from([(actor.to_owned(), role)]),
        })),
        Arc::new(FakeDirectoryRepository::default()),
        audit_repository.clone(),
    );

    Harness {
        service,
        audit_repository,
    }
}

fn state(code: &str, name: &str) -> StateUnit {
    StateUnit::new(code, name).unwrap_or_else(|_| unreachable!("valid state"))
}

#[tokio::test]
async fn reads_require_the_read_permission() {
    let harness = harness_with_actor("clerk", vec![Permission::StateWrite]);

    let result = harness.service.list_states("clerk").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn writes_require_the_write_permission() {
    let harness = harness_with_actor("viewer", vec![Permission::StateRead]);

    let result = harness
        .service
        .create_state("viewer", state("MH", "Maharashtra"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn state_creation_is_audited() {
    let harness = harness_with_actor(
        "clerk",
        vec![Permission::StateRead, Permission::StateWrite],
    );

    let result = harness
        .service
        .create_state("clerk", state("MH", "Maharashtra"))
        .await;
    assert!(result.is_ok());

    let events = harness.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn district_creation_requires_an_existing_state() {
    let harness = harness_with_actor("clerk", vec![Permission::DistrictWrite]);

    let district =
        District::new("Nashik", "MH").unwrap_or_else(|_| unreachable!("valid district"));
    let result = harness.service.create_district("clerk", district).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn booth_creation_requires_an_existing_division() {
    let harness = harness_with_actor("clerk", vec![Permission::BoothWrite]);

    let booth = Booth::new(104, "Ward 4 School", Uuid::new_v4())
        .unwrap_or_else(|_| unreachable!("valid booth"));
    let result = harness.service.create_booth("clerk", booth).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
