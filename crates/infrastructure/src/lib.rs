//! Infrastructure adapters: PostgreSQL repositories and password hashing.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod postgres_audit_repository;
mod postgres_auth_event_repository;
mod postgres_authorization_repository;
mod postgres_committee_repository;
mod postgres_directory_repository;
mod postgres_event_repository;
mod postgres_rate_limit_repository;
mod postgres_security_admin_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use postgres_audit_repository::{PostgresAuditLogRepository, PostgresAuditRepository};
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_committee_repository::PostgresCommitteeRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_rate_limit_repository::PostgresRateLimitRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
pub use postgres_user_repository::PostgresUserRepository;
