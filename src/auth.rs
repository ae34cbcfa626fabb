use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::ApiError;
use crate::session::{Session, SessionStore};

/// Picks the bearer header over the `token` query parameter.
pub fn provided_token(
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Option<String> {
    auth.map(|a| a.token().to_string())
        .or_else(|| query_token.map(|s| s.to_string()))
}

pub fn authorize(
    sessions: &SessionStore,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<Session, ApiError> {
    provided_token(auth, query_token)
        .and_then(|token| sessions.get(&token))
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))
}
