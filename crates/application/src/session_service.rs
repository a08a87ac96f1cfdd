//! Cached per-subject authorization snapshots.
//!
//! The dashboard re-polls its signed-in user on a fixed interval. Refreshes
//! here are ordered by a revision ticket taken before the repository read:
//! a refresh may only apply if no newer refresh started after it, so a slow
//! response can never overwrite data from a later poll.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use sangathan_core::AppResult;
use sangathan_domain::EffectiveRole;

use crate::AuthorizationRepository;

/// Default snapshot lifetime, matching the dashboard's poll period.
const DEFAULT_REFRESH_INTERVAL_SECONDS: i64 = 10;

#[derive(Debug, Clone)]
struct RoleSnapshot {
    role: Option<EffectiveRole>,
    revision: u64,
    refreshed_at: DateTime<Utc>,
}

#[derive(Default)]
struct SnapshotState {
    snapshots: HashMap<String, RoleSnapshot>,
    issued_revision: u64,
}

/// Ticket ordering a single refresh against concurrent ones.
///
/// Obtained before the repository read; a completed refresh is discarded
/// unless its ticket is newer than the last applied snapshot.
#[derive(Debug)]
pub struct RefreshTicket {
    subject: String,
    revision: u64,
}

/// Application service caching each subject's effective role.
#[derive(Clone)]
pub struct SessionSnapshotService {
    repository: Arc<dyn AuthorizationRepository>,
    state: Arc<RwLock<SnapshotState>>,
    refresh_interval: Duration,
}

impl SessionSnapshotService {
    /// Creates a snapshot service with the default refresh interval.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self::with_refresh_interval(
            repository,
            Duration::seconds(DEFAULT_REFRESH_INTERVAL_SECONDS),
        )
    }

    /// Creates a snapshot service with an explicit refresh interval.
    #[must_use]
    pub fn with_refresh_interval(
        repository: Arc<dyn AuthorizationRepository>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(SnapshotState::default())),
            refresh_interval,
        }
    }

    /// Returns the subject's effective role, refreshing a stale snapshot.
    ///
    /// When a refresh fails and a previous snapshot exists, the stale
    /// snapshot is returned instead of the error; a subject with no
    /// snapshot at all propagates the failure.
    pub async fn current_role(&self, subject: &str) -> AppResult<Option<EffectiveRole>> {
        let cached = {
            let state = self.state.read().await;
            state.snapshots.get(subject).cloned()
        };

        if let Some(ref snapshot) = cached
            && Utc::now() - snapshot.refreshed_at < self.refresh_interval
        {
            return Ok(snapshot.role.clone());
        }

        match self.refresh(subject).await {
            Ok(role) => Ok(role),
            Err(error) => match cached {
                // Stale data beats a forced logout while the backend store
                // is unavailable.
                Some(snapshot) => Ok(snapshot.role),
                None => Err(error),
            },
        }
    }

    /// Re-resolves the subject's role immediately.
    pub async fn refresh(&self, subject: &str) -> AppResult<Option<EffectiveRole>> {
        let ticket = self.begin_refresh(subject).await;
        let role = self
            .repository
            .find_role_for_subject(subject)
            .await?
            .map(EffectiveRole::from_role);

        let applied = self.complete_refresh(ticket, role.clone()).await;
        if applied {
            return Ok(role);
        }

        // A newer refresh finished first; serve whatever it applied.
        let state = self.state.read().await;
        Ok(state
            .snapshots
            .get(subject)
            .and_then(|snapshot| snapshot.role.clone()))
    }

    /// Issues an ordering ticket for a refresh that is about to start.
    pub async fn begin_refresh(&self, subject: &str) -> RefreshTicket {
        let mut state = self.state.write().await;
        state.issued_revision += 1;
        RefreshTicket {
            subject: subject.to_owned(),
            revision: state.issued_revision,
        }
    }

    /// Applies a finished refresh unless a newer one has already landed.
    ///
    /// Returns whether the snapshot was applied.
    pub async fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        role: Option<EffectiveRole>,
    ) -> bool {
        let mut state = self.state.write().await;

        if let Some(existing) = state.snapshots.get(&ticket.subject)
            && existing.revision > ticket.revision
        {
            return false;
        }

        state.snapshots.insert(
            ticket.subject,
            RoleSnapshot {
                role,
                revision: ticket.revision,
                refreshed_at: Utc::now(),
            },
        );
        true
    }

    /// Drops the cached snapshot for one subject.
    ///
    /// Role administration calls this so grant changes take effect on the
    /// subject's next request instead of the next poll.
    pub async fn invalidate(&self, subject: &str) {
        let mut state = self.state.write().await;
        state.snapshots.remove(subject);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Duration;
    use sangathan_core::{AppError, AppResult};
    use sangathan_domain::{EffectiveRole, Permission, Role, SidebarAccess};
    use tokio::sync::Mutex;

    use crate::AuthorizationRepository;

    use super::SessionSnapshotService;

    struct ScriptedRepository {
        responses: Mutex<Vec<AppResult<Option<Role>>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedRepository {
        fn new(responses: Vec<AppResult<Option<Role>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        async fn call_count(&self) -> u32 {
            *self.calls.lock().await
        }
    }

    #[async_trait]
    impl AuthorizationRepository for ScriptedRepository {
        async fn find_role_for_subject(&self, _subject: &str) -> AppResult<Option<Role>> {
            *self.calls.lock().await += 1;
            let mut responses = self.responses.lock().await;
            if responses.is_empty() {
                return Ok(None);
            }
            responses.remove(0)
        }
    }

    fn role_named(name: &str) -> Role {
        Role::new(
            name,
            [Permission::DashboardView],
            SidebarAccess::from_entries(["*".to_owned()]),
        )
        .unwrap_or_else(|_| unreachable!("valid role"))
    }

    #[tokio::test]
    async fn fresh_snapshot_is_served_without_a_repository_read() {
        let repository = Arc::new(ScriptedRepository::new(vec![
            Ok(Some(role_named("manager"))),
            Ok(Some(role_named("changed"))),
        ]));
        let service = SessionSnapshotService::new(repository.clone());

        let first = service.current_role("asha").await;
        assert_eq!(
            first.ok().flatten().map(|role| role.name().to_owned()),
            Some("manager".to_owned())
        );

        let second = service.current_role("asha").await;
        assert_eq!(
            second.ok().flatten().map(|role| role.name().to_owned()),
            Some("manager".to_owned())
        );
        assert_eq!(repository.call_count().await, 1);
    }

    #[tokio::test]
    async fn stale_snapshot_triggers_a_refresh() {
        let repository = Arc::new(ScriptedRepository::new(vec![
            Ok(Some(role_named("manager"))),
            Ok(Some(role_named("observer"))),
        ]));
        let service =
            SessionSnapshotService::with_refresh_interval(repository.clone(), Duration::zero());

        let _ = service.current_role("asha").await;
        let second = service.current_role("asha").await;
        assert_eq!(
            second.ok().flatten().map(|role| role.name().to_owned()),
            Some("observer".to_owned())
        );
        assert_eq!(repository.call_count().await, 2);
    }

    #[tokio::test]
    async fn out_of_order_completion_never_overwrites_newer_data() {
        let repository = Arc::new(ScriptedRepository::new(Vec::new()));
        let service = SessionSnapshotService::new(repository);

        let slow_ticket = service.begin_refresh("asha").await;
        let fast_ticket = service.begin_refresh("asha").await;

        let fast_applied = service
            .complete_refresh(
                fast_ticket,
                Some(EffectiveRole::from_role(role_named("observer"))),
            )
            .await;
        assert!(fast_applied);

        // The older poll finishes last; its payload must be discarded.
        let slow_applied = service
            .complete_refresh(
                slow_ticket,
                Some(EffectiveRole::from_role(role_named("manager"))),
            )
            .await;
        assert!(!slow_applied);

        let current = service.current_role("asha").await;
        assert_eq!(
            current.ok().flatten().map(|role| role.name().to_owned()),
            Some("observer".to_owned())
        );
    }

    #[tokio::test]
    async fn refresh_failure_keeps_the_stale_snapshot() {
        let repository = Arc::new(ScriptedRepository::new(vec![
            Ok(Some(role_named("manager"))),
            Err(AppError::Internal("connection reset".to_owned())),
        ]));
        let service =
            SessionSnapshotService::with_refresh_interval(repository, Duration::zero());

        let _ = service.current_role("asha").await;
        let after_failure = service.current_role("asha").await;
        assert_eq!(
            after_failure
                .ok()
                .flatten()
                .map(|role| role.name().to_owned()),
            Some("manager".to_owned())
        );
    }

    #[tokio::test]
    async fn refresh_failure_with_no_snapshot_propagates() {
        let repository = Arc::new(ScriptedRepository::new(vec![Err(AppError::Internal(
            "connection reset".to_owned(),
        ))]));
        let service = SessionSnapshotService::new(repository);

        let result = service.current_role("asha").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn invalidate_forces_the_next_read_to_resolve() {
        let repository = Arc::new(ScriptedRepository::new(vec![
            Ok(Some(role_named("manager"))),
            Ok(Some(role_named("observer"))),
        ]));
        let service = SessionSnapshotService::new(repository.clone());

        let _ = service.current_role("asha").await;
        service.invalidate("asha").await;

        let second = service.current_role("asha").await;
        assert_eq!(
            second.ok().flatten().map(|role| role.name().to_owned()),
            Some("observer".to_owned())
        );
        assert_eq!(repository.call_count().await, 2);
    }
}
