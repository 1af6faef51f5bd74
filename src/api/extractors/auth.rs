use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use crate::domain::models::user::{Principal, ROLE_PROVIDER, ROLE_USER};
use tracing::Span;

/// Principal forwarded by the upstream identity gateway. Verification is
/// terminated there; these headers are trusted as-is.
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, "X-User-Id")?;
        let role = header_value(parts, "X-User-Role")?;
        let email = header_value(parts, "X-User-Email")?;

        match role.as_str() {
            ROLE_PROVIDER | ROLE_USER => {}
            _ => return Err(StatusCode::UNAUTHORIZED),
        }

        Span::current().record("user_id", &id);

        Ok(AuthUser(Principal { id, role, email }))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, StatusCode> {
    parts.headers.get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(StatusCode::UNAUTHORIZED)
}
