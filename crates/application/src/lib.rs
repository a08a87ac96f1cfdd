//! Application services and ports.

#![forbid(unsafe_code)]

mod audit;
mod auth_event_service;
mod authorization_service;
mod committee_service;
mod directory_service;
mod event_service;
mod rate_limit_service;
mod security_admin_ports;
mod security_admin_service;
mod session_service;
mod user_service;

pub use audit::{AuditEvent, AuditRepository};
pub use auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use committee_service::{CommitteeRepository, CommitteeService, SamitiRecord};
pub use directory_service::{
    BoothRecord, DirectoryRepository, DirectoryService, DistrictRecord, DivisionRecord,
    StateRecord,
};
pub use event_service::{EventRepository, EventService, OrgEventRecord};
pub use rate_limit_service::{
    RateLimitInfo, RateLimitRepository, RateLimitRule, RateLimitService,
};
pub use security_admin_ports::{
    AuditLogEntry, AuditLogRepository, CreateRoleInput, RoleAssignment, RoleDefinition,
    SecurityAdminRepository,
};
pub use security_admin_service::SecurityAdminService;
pub use session_service::{RefreshTicket, SessionSnapshotService};
pub use user_service::{
    AuthOutcome, CreateUserParams, FAILED_LOGIN_LOCK_THRESHOLD, PasswordHasher, UserRecord,
    UserRepository, UserService,
};
