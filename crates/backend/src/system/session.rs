use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

/// Header carrying the dashboard session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Session used by callers that send no header
pub const DEFAULT_SESSION: &str = "default";

const MAX_SESSION_LEN: usize = 128;

/// Trimmed, non-empty session id from the request headers
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.chars().take(MAX_SESSION_LEN).collect())
}

/// Key of the caller's filter option cache entries.
/// Usage in handlers: `async fn handler(SessionKey(session): SessionKey) -> Response`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionKey(
            session_from_headers(&parts.headers).unwrap_or_else(|| DEFAULT_SESSION.to_string()),
        ))
    }
}
