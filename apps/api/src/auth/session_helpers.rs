use axum::http::HeaderMap;
use sangathan_core::{AppError, UserIdentity};
use tower_sessions::Session;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

/// Persists a freshly authenticated identity into the session.
///
/// The session id is cycled first (OWASP Session Management: regenerate on
/// privilege change).
pub(super) async fn establish_session(
    session: &Session,
    identity: &UserIdentity,
) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    Ok(())
}

pub(super) fn extract_request_context(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    (ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::extract_request_context;

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let (ip_address, user_agent) = extract_request_context(&headers);
        assert_eq!(ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(user_agent, None);
    }

    #[test]
    fn empty_headers_yield_nothing() {
        let headers = HeaderMap::new();
        let (ip_address, user_agent) = extract_request_context(&headers);
        assert_eq!(ip_address, None);
        assert_eq!(user_agent, None);
    }
}
