use sangathan_application::{
    AuthEventService, AuthorizationService, CommitteeService, DirectoryService, EventService,
    RateLimitService, SecurityAdminService, SessionSnapshotService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub session_snapshots: SessionSnapshotService,
    pub security_admin_service: SecurityAdminService,
    pub directory_service: DirectoryService,
    pub committee_service: CommitteeService,
    pub event_service: EventService,
    pub user_service: UserService,
    pub auth_event_service: AuthEventService,
    pub rate_limit_service: RateLimitService,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
