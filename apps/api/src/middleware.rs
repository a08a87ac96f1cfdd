//! Request middleware: authentication, route admission and rate limiting.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use sangathan_core::{AppError, UserIdentity};
use sangathan_domain::Permission;
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Any-of permission requirement attached to a protected route group.
///
/// An empty list admits any authenticated user.
#[derive(Debug, Clone)]
pub struct RequiredPermissions(pub Vec<Permission>);

/// Rejects requests without a session identity.
///
/// A request that reaches a protected route with no identity gets its
/// session flushed, so a half-established or corrupt session cannot linger.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    let Some(identity) = identity else {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Route admission gate.
///
/// Resolves the caller's cached role snapshot and admits the request when
/// at least one of the route's required permissions is granted. Runs after
/// [`require_auth`], so a missing identity extension is an internal error,
/// not a policy decision.
pub async fn require_permissions(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let required = request
        .extensions()
        .get::<RequiredPermissions>()
        .cloned()
        .ok_or_else(|| {
            AppError::Internal("route is missing its permission requirements".to_owned())
        })?;

    let identity = request
        .extensions()
        .get::<UserIdentity>()
        .cloned()
        .ok_or_else(|| {
            AppError::Internal("route admission ran before authentication".to_owned())
        })?;

    if required.0.is_empty() {
        return Ok(next.run(request).await);
    }

    let role = state
        .session_snapshots
        .current_role(identity.subject())
        .await?;

    let admitted = role.is_some_and(|role| role.has_any_permission(&required.0));
    if !admitted {
        return Err(AppError::Forbidden(
            "you do not have permission to access this page".to_owned(),
        )
        .into());
    }

    Ok(next.run(request).await)
}

/// Blocks cross-site state-changing requests.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Applies the rate limit rule attached to the route group, keyed by the
/// caller's IP address.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let rule = request
        .extensions()
        .get::<sangathan_application::RateLimitRule>()
        .cloned()
        .ok_or_else(|| AppError::Internal("route is missing its rate limit rule".to_owned()))?;

    let key = client_ip(request.headers()).unwrap_or_else(|| "unknown".to_owned());
    state.rate_limit_service.check_rate_limit(&rule, &key).await?;

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
