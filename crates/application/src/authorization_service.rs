use std::sync::Arc;

use async_trait::async_trait;

use sangathan_core::{AppError, AppResult};
use sangathan_domain::{EffectiveRole, Permission, Role};

mod navigation;
#[cfg(test)]
mod tests;

/// Repository port for role lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Returns the role assigned to a subject, if any.
    async fn find_role_for_subject(&self, subject: &str) -> AppResult<Option<Role>>;
}

/// Application service answering permission membership queries.
///
/// Every query resolves the subject's stored role and collapses it into an
/// [`EffectiveRole`] before checking. An absent role never errors; it simply
/// grants nothing.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the subject's effective role, if one is assigned.
    pub async fn resolve_role(&self, subject: &str) -> AppResult<Option<EffectiveRole>> {
        let role = self.repository.find_role_for_subject(subject).await?;
        Ok(role.map(EffectiveRole::from_role))
    }

    /// Returns whether the subject currently holds the permission.
    pub async fn has_permission(&self, subject: &str, permission: Permission) -> AppResult<bool> {
        let role = self.resolve_role(subject).await?;
        Ok(role.is_some_and(|role| role.has_permission(permission)))
    }

    /// Returns whether the subject holds at least one of the permissions.
    ///
    /// An empty request is vacuously false.
    pub async fn has_any_permission(
        &self,
        subject: &str,
        permissions: &[Permission],
    ) -> AppResult<bool> {
        let role = self.resolve_role(subject).await?;
        Ok(role.is_some_and(|role| role.has_any_permission(permissions)))
    }

    /// Returns whether the subject holds every one of the permissions.
    ///
    /// An empty request is vacuously true.
    pub async fn has_all_permissions(
        &self,
        subject: &str,
        permissions: &[Permission],
    ) -> AppResult<bool> {
        let role = self.resolve_role(subject).await?;
        Ok(match role {
            Some(role) => role.has_all_permissions(permissions),
            // No role grants nothing, so only the vacuous request passes.
            None => permissions.is_empty(),
        })
    }

    /// Returns whether the subject may access a sidebar path.
    pub async fn allows_sidebar_path(&self, subject: &str, path: &str) -> AppResult<bool> {
        let role = self.resolve_role(subject).await?;
        Ok(role.is_some_and(|role| role.allows_path(path)))
    }

    /// Ensures the subject holds the required permission.
    pub async fn require_permission(
        &self,
        subject: &str,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_permission(subject, permission).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{subject}' is missing permission '{}'",
            permission.as_str()
        )))
    }
}
