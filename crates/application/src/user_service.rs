//! User account ports and application service.
//!
//! Owns login, password changes and administrator-driven account creation.
//! Follows OWASP guidance on generic failure messages and hashing on every
//! code path to avoid timing side-channels.

use std::sync::Arc;

use async_trait::async_trait;

use sangathan_core::{AppError, AppResult};
use sangathan_domain::{EmailAddress, UserId, validate_password};

use crate::{AuditEvent, AuditRepository, AuthEvent, AuthEventService};

#[cfg(test)]
mod tests;

/// Failed logins tolerated before the repository locks the account.
pub const FAILED_LOGIN_LOCK_THRESHOLD: i32 = 10;

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Display name shown in the dashboard.
    pub display_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Lists all user records.
    async fn list(&self) -> AppResult<Vec<UserRecord>>;

    /// Creates a new user record. Returns the assigned user ID.
    async fn create(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> AppResult<UserId>;

    /// Updates the password hash for a user.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Increments the failed login counter and optionally locks the account.
    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()>;

    /// Resets the failed login counter and removes any account lock.
    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps the application layer free
/// of direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

/// Parameters for administrator-driven account creation.
pub struct CreateUserParams {
    /// Email address for the new account.
    pub email: String,
    /// Display name shown in the dashboard.
    pub display_name: String,
    /// Plaintext password (validated against OWASP rules).
    pub password: String,
}

/// Application service for user authentication and account management.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
    auth_event_service: AuthEventService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            audit_repository,
            auth_event_service,
        }
    }

    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for any failure (unknown email, wrong
    /// password, locked account) to prevent enumeration.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthOutcome> {
        let user = self.user_repository.find_by_email(email).await?;

        let Some(user) = user else {
            // OWASP: always hash to keep response timing uniform.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if let Some(locked_until) = user.locked_until
            && chrono::Utc::now() < locked_until
        {
            let _ = self.password_hasher.hash_password(password);

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "account_locked".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            self.user_repository.record_failed_login(user.id).await?;

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "invalid_password".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        self.user_repository.reset_failed_logins(user.id).await?;

        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(user.id.to_string()),
                event_type: "login_attempt".to_owned(),
                outcome: "success".to_owned(),
                ip_address,
                user_agent,
            })
            .await?;

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Creates a user account on behalf of an administrator.
    ///
    /// The caller is responsible for the permission check and for assigning
    /// a role to the new subject.
    pub async fn create_user(
        &self,
        actor_subject: &str,
        params: CreateUserParams,
    ) -> AppResult<UserId> {
        let email_address = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        let display_name = params.display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }

        let existing = self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                email_address.as_str()
            )));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user_id = self
            .user_repository
            .create(email_address.as_str(), display_name, &password_hash)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor_subject.to_owned(),
                action: sangathan_domain::AuditAction::UserCreated,
                resource_type: "user".to_owned(),
                resource_id: user_id.to_string(),
                detail: Some(format!("created account for '{}'", email_address.as_str())),
            })
            .await?;

        Ok(user_id)
    }

    /// Changes the password for an authenticated user.
    ///
    /// Requires the current password for verification.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        let current_valid = self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?;

        if !current_valid {
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository.update_password(user_id, &new_hash).await
    }

    /// Lists all user accounts.
    pub async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        self.user_repository.list().await
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }
}
