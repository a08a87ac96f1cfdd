//! Sangathan API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use sangathan_application::{
    AuthEventService, AuthorizationService, CommitteeService, DirectoryService, EventService,
    RateLimitRule, RateLimitService, SecurityAdminService, SessionSnapshotService, UserService,
};
use sangathan_core::AppError;
use sangathan_domain::Permission;
use sangathan_infrastructure::{
    Argon2PasswordHasher, PostgresAuditLogRepository, PostgresAuditRepository,
    PostgresAuthEventRepository, PostgresAuthorizationRepository, PostgresCommitteeRepository,
    PostgresDirectoryRepository, PostgresEventRepository, PostgresRateLimitRepository,
    PostgresSecurityAdminRepository, PostgresUserRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::middleware::RequiredPermissions;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let bootstrap_token = required_env("AUTH_BOOTSTRAP_TOKEN")?;

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let snapshot_refresh = env::var("SNAPSHOT_REFRESH_SECONDS")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|seconds| *seconds > 0);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let authorization_repository = Arc::new(PostgresAuthorizationRepository::new(pool.clone()));
    let authorization_service = AuthorizationService::new(authorization_repository.clone());
    let session_snapshots = match snapshot_refresh {
        Some(seconds) => SessionSnapshotService::with_refresh_interval(
            authorization_repository.clone(),
            chrono::Duration::seconds(seconds),
        ),
        None => SessionSnapshotService::new(authorization_repository.clone()),
    };

    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));
    let security_admin_repository = Arc::new(PostgresSecurityAdminRepository::new(pool.clone()));
    let security_admin_service = SecurityAdminService::new(
        authorization_service.clone(),
        security_admin_repository,
        audit_log_repository,
        audit_repository.clone(),
        session_snapshots.clone(),
    );

    let auth_event_repository = Arc::new(PostgresAuthEventRepository::new(pool.clone()));
    let auth_event_service = AuthEventService::new(auth_event_repository);

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let user_service = UserService::new(
        user_repository,
        password_hasher,
        audit_repository.clone(),
        auth_event_service.clone(),
    );

    let directory_repository = Arc::new(PostgresDirectoryRepository::new(pool.clone()));
    let directory_service = DirectoryService::new(
        authorization_service.clone(),
        directory_repository,
        audit_repository.clone(),
    );

    let committee_repository = Arc::new(PostgresCommitteeRepository::new(pool.clone()));
    let committee_service = CommitteeService::new(
        authorization_service.clone(),
        committee_repository,
        audit_repository.clone(),
    );

    let event_repository = Arc::new(PostgresEventRepository::new(pool.clone()));
    let event_service = EventService::new(
        authorization_service.clone(),
        event_repository,
        audit_repository,
    );

    let rate_limit_repository = Arc::new(PostgresRateLimitRepository::new(pool.clone()));
    let rate_limit_service = RateLimitService::new(rate_limit_repository);

    // Hourly sweep of expired rate limit counters.
    let cleanup_service = rate_limit_service.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            ticker.tick().await;
            if let Err(error) = cleanup_service.cleanup().await {
                tracing::warn!(%error, "rate limit cleanup failed");
            }
        }
    });

    let app_state = AppState {
        authorization_service,
        session_snapshots,
        security_admin_service,
        directory_service,
        committee_service,
        event_service,
        user_service,
        auth_event_service,
        rate_limit_service,
        frontend_url: frontend_url.clone(),
        bootstrap_token,
    };

    let states_routes = permission_gated(
        Router::new()
            .route(
                "/api/states",
                get(handlers::directory::list_states_handler)
                    .post(handlers::directory::create_state_handler),
            )
            .route(
                "/api/states/{code}",
                put(handlers::directory::update_state_handler)
                    .delete(handlers::directory::delete_state_handler),
            ),
        &app_state,
        vec![Permission::StateRead, Permission::StateWrite],
    );

    let districts_routes = permission_gated(
        Router::new()
            .route(
                "/api/districts",
                get(handlers::directory::list_districts_handler)
                    .post(handlers::directory::create_district_handler),
            )
            .route(
                "/api/districts/{id}",
                put(handlers::directory::update_district_handler)
                    .delete(handlers::directory::delete_district_handler),
            ),
        &app_state,
        vec![Permission::DistrictRead, Permission::DistrictWrite],
    );

    let divisions_routes = permission_gated(
        Router::new()
            .route(
                "/api/divisions",
                get(handlers::directory::list_divisions_handler)
                    .post(handlers::directory::create_division_handler),
            )
            .route(
                "/api/divisions/{id}",
                put(handlers::directory::update_division_handler)
                    .delete(handlers::directory::delete_division_handler),
            ),
        &app_state,
        vec![Permission::DivisionRead, Permission::DivisionWrite],
    );

    let booths_routes = permission_gated(
        Router::new()
            .route(
                "/api/booths",
                get(handlers::directory::list_booths_handler)
                    .post(handlers::directory::create_booth_handler),
            )
            .route(
                "/api/booths/{id}",
                put(handlers::directory::update_booth_handler)
                    .delete(handlers::directory::delete_booth_handler),
            ),
        &app_state,
        vec![Permission::BoothRead, Permission::BoothWrite],
    );

    let samitis_routes = permission_gated(
        Router::new()
            .route(
                "/api/samitis",
                get(handlers::committees::list_samitis_handler)
                    .post(handlers::committees::create_samiti_handler),
            )
            .route(
                "/api/samitis/{id}",
                put(handlers::committees::update_samiti_handler)
                    .delete(handlers::committees::delete_samiti_handler),
            ),
        &app_state,
        vec![Permission::CommitteeRead, Permission::CommitteeWrite],
    );

    let events_routes = permission_gated(
        Router::new()
            .route(
                "/api/events",
                get(handlers::events::list_events_handler)
                    .post(handlers::events::create_event_handler),
            )
            .route(
                "/api/events/{id}",
                put(handlers::events::update_event_handler)
                    .delete(handlers::events::delete_event_handler),
            ),
        &app_state,
        vec![Permission::EventRead, Permission::EventWrite],
    );

    let users_routes = permission_gated(
        Router::new()
            .route(
                "/api/users",
                get(handlers::users::list_users_handler)
                    .post(handlers::users::create_user_handler),
            )
            .route("/api/users/{id}", get(handlers::users::get_user_handler)),
        &app_state,
        vec![Permission::UserManage],
    );

    let roles_routes = permission_gated(
        Router::new()
            .route(
                "/api/security/roles",
                get(handlers::security::list_roles_handler)
                    .post(handlers::security::create_role_handler),
            )
            .route(
                "/api/security/permissions",
                get(handlers::security::list_permission_catalog_handler),
            )
            .route(
                "/api/security/role-assignments",
                get(handlers::security::list_role_assignments_handler)
                    .post(handlers::security::assign_role_handler),
            )
            .route(
                "/api/security/role-unassignments",
                post(handlers::security::unassign_role_handler),
            ),
        &app_state,
        vec![Permission::RoleManage],
    );

    let audit_routes = permission_gated(
        Router::new().route(
            "/api/security/audit-log",
            get(handlers::security::list_audit_log_handler),
        ),
        &app_state,
        vec![Permission::AuditRead],
    );

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/auth/refresh", get(auth::refresh_handler))
        .route("/api/navigation", get(handlers::navigation::navigation_handler))
        .route("/api/profile/password", put(auth::change_password_handler))
        .merge(states_routes)
        .merge(districts_routes)
        .merge(divisions_routes)
        .merge(booths_routes)
        .merge(samitis_routes)
        .merge(events_routes)
        .merge(users_routes)
        .merge(roles_routes)
        .merge(audit_routes)
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    // Login: 10 attempts per IP per 15 minutes (OWASP Credential Stuffing
    // Prevention).
    let login_rate_rule = RateLimitRule::new("login", 10, 15 * 60);

    let login_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(login_rate_rule));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .merge(login_routes)
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "sangathan-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

/// Attaches the route admission gate with its any-of permission list.
fn permission_gated(
    routes: Router<AppState>,
    app_state: &AppState,
    permissions: Vec<Permission>,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_permissions,
        ))
        .layer(axum::Extension(RequiredPermissions(permissions)))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
