use std::sync::Arc;

use async_trait::async_trait;
use sangathan_core::AppResult;
use sangathan_domain::UserId;
use tokio::sync::Mutex;

use crate::{AuditEvent, AuditRepository, AuthEvent, AuthEventRepository, AuthEventService};

use super::{
    AuthOutcome, CreateUserParams, PasswordHasher, UserRecord, UserRepository, UserService,
};

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<Vec<UserRecord>>,
    failed_logins: Mutex<u32>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.users.lock().await.clone())
    }

    async fn create(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> AppResult<UserId> {
        let user_id = UserId::new();
        self.users.lock().await.push(UserRecord {
            id: user_id,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            password_hash: password_hash.to_owned(),
            failed_login_count: 0,
            locked_until: None,
        });
        Ok(user_id)
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        for user in self.users.lock().await.iter_mut() {
            if user.id == user_id {
                user.password_hash = password_hash.to_owned();
            }
        }
        Ok(())
    }

    async fn record_failed_login(&self, _user_id: UserId) -> AppResult<()> {
        *self.failed_logins.lock().await += 1;
        Ok(())
    }

    async fn reset_failed_logins(&self, _user_id: UserId) -> AppResult<()> {
        *self.failed_logins.lock().await = 0;
        Ok(())
    }
}

struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
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

#[derive(Default)]
struct FakeAuthEventRepository {
    events: Mutex<Vec<AuthEvent>>,
}

#[async_trait]
impl AuthEventRepository for FakeAuthEventRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct Harness {
    service: UserService,
    user_repository: Arc<FakeUserRepository>,
    auth_events: Arc<FakeAuthEventRepository>,
}

fn harness() -> Harness {
    let user_repository = Arc::new(FakeUserRepository::default());
    let auth_events = Arc::new(FakeAuthEventRepository::default());
    let service = UserService::new(
        user_repository.clone(),
        Arc::new(FakePasswordHasher),
        Arc::new(FakeAuditRepository::default()),
        AuthEventService::new(auth_events.clone()),
    );

    Harness {
        service,
        user_repository,
        auth_events,
    }
}

async fn seed_user(harness: &Harness, email: &str, password: &str) -> UserId {
    harness
        .user_repository
        .create(email, "Asha Patil", &format!("hashed:{password}"))
        .await
        .unwrap_or_default()
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let harness = harness();
    seed_user(&harness, "asha@example.org", "a-strong-passphrase").await;

    let outcome = harness
        .service
        .login("asha@example.org", "a-strong-passphrase", None, None)
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Authenticated(_))));

    let events = harness.auth_events.events.lock().await;
    assert_eq!(events.last().map(|event| event.outcome.clone()), Some("success".to_owned()));
}

#[tokio::test]
async fn login_fails_generically_for_unknown_email() {
    let harness = harness();

    let outcome = harness
        .service
        .login("nobody@example.org", "whatever-password", None, None)
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
}

#[tokio::test]
async fn wrong_password_records_a_failed_attempt() {
    let harness = harness();
    seed_user(&harness, "asha@example.org", "a-strong-passphrase").await;

    let outcome = harness
        .service
        .login("asha@example.org", "not-the-password", None, None)
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
    assert_eq!(*harness.user_repository.failed_logins.lock().await, 1);
}

#[tokio::test]
async fn locked_account_fails_generically() {
    let harness = harness();
    let user_id = seed_user(&harness, "asha@example.org", "a-strong-passphrase").await;
    {
        let mut users = harness.user_repository.users.lock().await;
        for user in users.iter_mut() {
            if user.id == user_id {
                user.locked_until = Some(chrono::Utc::now() + chrono::Duration::minutes(15));
            }
        }
    }

    let outcome = harness
        .service
        .login("asha@example.org", "a-strong-passphrase", None, None)
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let harness = harness();
    seed_user(&harness, "asha@example.org", "a-strong-passphrase").await;

    let result = harness
        .service
        .create_user(
            "admin-subject",
            CreateUserParams {
                email: "asha@example.org".to_owned(),
                display_name: "Asha Patil".to_owned(),
                password: "another-strong-one".to_owned(),
            },
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn change_password_requires_the_current_one() {
    let harness = harness();
    let user_id = seed_user(&harness, "asha@example.org", "a-strong-passphrase").await;

    let rejected = harness
        .service
        .change_password(user_id, "wrong-current", "a-new-passphrase")
        .await;
    assert!(rejected.is_err());

    let accepted = harness
        .service
        .change_password(user_id, "a-strong-passphrase", "a-new-passphrase")
        .await;
    assert!(accepted.is_ok());
}
