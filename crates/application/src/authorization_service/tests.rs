use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sangathan_core::AppResult;
use sangathan_domain::{Permission, Role, SidebarAccess};

use super::{AuthorizationRepository, AuthorizationService};

struct FakeAuthorizationRepository {
    roles: HashMap<String, Role>,
}

impl FakeAuthorizationRepository {
    fn with_role(subject: &str, role: Role) -> Self {
        Self {
            roles: HashMap::from([(subject.to_owned(), role)]),
        }
    }

    fn empty() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn find_role_for_subject(&self, subject: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.get(subject).cloned())
    }
}

fn manager_role() -> Role {
    Role::new(
        "manager",
        [Permission::DashboardView, Permission::EventRead],
        SidebarAccess::from_entries(["/dashboard".to_owned(), "/events".to_owned()]),
    )
    .unwrap_or_else(|_| unreachable!("valid role"))
}

fn service_with(repository: FakeAuthorizationRepository) -> AuthorizationService {
    AuthorizationService::new(Arc::new(repository))
}

#[tokio::test]
async fn granted_permission_passes() {
    let service = service_with(FakeAuthorizationRepository::with_role("asha", manager_role()));

    let result = service
        .has_permission("asha", Permission::DashboardView)
        .await;
    assert_eq!(result.ok(), Some(true));
}

#[tokio::test]
async fn missing_grant_is_denied() {
    let service = service_with(FakeAuthorizationRepository::with_role("asha", manager_role()));

    let result = service.has_permission("asha", Permission::RoleManage).await;
    assert_eq!(result.ok(), Some(false));

    let required = service
        .require_permission("asha", Permission::RoleManage)
        .await;
    assert!(required.is_err());
}

#[tokio::test]
async fn subject_without_role_is_denied_everything() {
    let service = service_with(FakeAuthorizationRepository::empty());

    let result = service
        .has_permission("ghost", Permission::DashboardView)
        .await;
    assert_eq!(result.ok(), Some(false));

    let sidebar = service.allows_sidebar_path("ghost", "/dashboard").await;
    assert_eq!(sidebar.ok(), Some(false));
}

#[tokio::test]
async fn superadmin_named_role_bypasses_every_check() {
    let role = Role::new("superadmin", [], SidebarAccess::from_entries([]))
        .unwrap_or_else(|_| unreachable!("valid role"));
    let service = service_with(FakeAuthorizationRepository::with_role("admin", role));

    for permission in Permission::all() {
        let result = service.has_permission("admin", *permission).await;
        assert_eq!(result.ok(), Some(true));
    }

    let sidebar = service.allows_sidebar_path("admin", "/never-configured").await;
    assert_eq!(sidebar.ok(), Some(true));
}

#[tokio::test]
async fn vacuous_any_is_false_and_vacuous_all_is_true() {
    let service = service_with(FakeAuthorizationRepository::with_role("asha", manager_role()));

    let any = service.has_any_permission("asha", &[]).await;
    assert_eq!(any.ok(), Some(false));

    let all = service.has_all_permissions("asha", &[]).await;
    assert_eq!(all.ok(), Some(true));
}

#[tokio::test]
async fn all_of_fails_without_a_role_unless_vacuous() {
    let service = service_with(FakeAuthorizationRepository::empty());

    let all = service
        .has_all_permissions("ghost", &[Permission::DashboardView])
        .await;
    assert_eq!(all.ok(), Some(false));

    let vacuous = service.has_all_permissions("ghost", &[]).await;
    assert_eq!(vacuous.ok(), Some(true));
}

#[tokio::test]
async fn sidebar_check_is_wildcard_or_exact() {
    let role = Role::new(
        "field_officer",
        [Permission::BoothRead],
        SidebarAccess::from_entries(["/booths".to_owned()]),
    )
    .unwrap_or_else(|_| unreachable!("valid role"));
    let service = service_with(FakeAuthorizationRepository::with_role("kiran", role));

    assert_eq!(
        service.allows_sidebar_path("kiran", "/booths").await.ok(),
        Some(true)
    );
    assert_eq!(
        service.allows_sidebar_path("kiran", "/booths/42").await.ok(),
        Some(false)
    );
}

#[tokio::test]
async fn navigation_is_filtered_by_grants() {
    let service = service_with(FakeAuthorizationRepository::with_role(
        "asha",
        Role::new(
            "manager",
            [Permission::DashboardView, Permission::EventRead],
            SidebarAccess::from_entries(["*".to_owned()]),
        )
        .unwrap_or_else(|_| unreachable!("valid role")),
    ));

    let menu = service.resolve_navigation("asha").await.unwrap_or_default();
    let names: Vec<&str> = menu.iter().map(|item| item.logical_name()).collect();
    assert_eq!(names, vec!["dashboard", "events"]);
}

#[tokio::test]
async fn navigation_drops_groups_with_no_visible_children() {
    let service = service_with(FakeAuthorizationRepository::with_role(
        "asha",
        Role::new(
            "booth_manager",
            [Permission::BoothRead],
            SidebarAccess::from_entries(["*".to_owned()]),
        )
        .unwrap_or_else(|_| unreachable!("valid role")),
    ));

    let menu = service.resolve_navigation("asha").await.unwrap_or_default();
    assert_eq!(menu.len(), 1);

    let directory = menu.first();
    assert_eq!(directory.map(|item| item.logical_name()), Some("directory"));
    assert_eq!(directory.map(|item| item.children().len()), Some(1));
}

#[tokio::test]
async fn navigation_respects_the_sidebar_allow_list() {
    let service = service_with(FakeAuthorizationRepository::with_role(
        "asha",
        Role::new(
            "manager",
            [Permission::DashboardView, Permission::EventRead],
            SidebarAccess::from_entries(["/dashboard".to_owned()]),
        )
        .unwrap_or_else(|_| unreachable!("valid role")),
    ));

    let menu = service.resolve_navigation("asha").await.unwrap_or_default();
    let names: Vec<&str> = menu.iter().map(|item| item.logical_name()).collect();
    assert_eq!(names, vec!["dashboard"]);
}

#[tokio::test]
async fn navigation_is_empty_without_a_role() {
    let service = service_with(FakeAuthorizationRepository::empty());

    let menu = service.resolve_navigation("ghost").await.unwrap_or_default();
    assert!(menu.is_empty());
}
