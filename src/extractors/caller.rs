//! Caller identity headers. Accepted on every request and used for logging only.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const SESSION_ID_HEADER: &str = "X-Session-Id";

/// Optional identity sent by the portal client. Never rejects a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Option<String>,
    pub auth_token: Option<String>,
    pub session_id: Option<String>,
}

impl CallerIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        CallerIdentity {
            user_id: get(USER_ID_HEADER),
            auth_token: get(AUTH_TOKEN_HEADER),
            session_id: get(SESSION_ID_HEADER),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallerIdentity::from_headers(&parts.headers))
    }
}
