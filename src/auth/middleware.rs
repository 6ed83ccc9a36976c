//! Bearer-token gate for protected routes.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{
    error::{ApiError, INVALID_TOKEN, MUST_LOG_IN},
    state::AppState,
};

/// Identity resolved from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i32);

/// Resolves the caller from the `Authorization: Bearer <token>` header.
///
/// Every verification failure collapses into the same "invalid token" answer.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized(MUST_LOG_IN))?;

    let user_id = keys.verify_user(token).map_err(|e| {
        warn!(error = %e, "rejected bearer token");
        ApiError::Unauthorized(INVALID_TOKEN)
    })?;

    Ok(AuthUser(user_id))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(req.headers(), &state.keys)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(ApiError::Unauthorized(MUST_LOG_IN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::HeaderValue;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: None,
        })
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn message(err: ApiError) -> &'static str {
        match err {
            ApiError::Unauthorized(m) => m,
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn valid_bearer_resolves_subject() {
        let keys = make_keys("s");
        let token = keys.issue(9).unwrap();
        let user = authenticate(&headers(&format!("Bearer {token}")), &keys).unwrap();
        assert_eq!(user, AuthUser(9));
    }

    #[test]
    fn missing_header_asks_for_login() {
        let err = authenticate(&HeaderMap::new(), &make_keys("s")).unwrap_err();
        assert_eq!(message(err), MUST_LOG_IN);
    }

    #[test]
    fn empty_or_foreign_scheme_asks_for_login() {
        let keys = make_keys("s");
        assert_eq!(message(authenticate(&headers("Bearer "), &keys).unwrap_err()), MUST_LOG_IN);
        assert_eq!(message(authenticate(&headers("Basic abc"), &keys).unwrap_err()), MUST_LOG_IN);
    }

    #[test]
    fn bad_tokens_are_indistinguishable() {
        let keys = make_keys("s");
        let foreign = format!("Bearer {}", make_keys("other").issue(9).unwrap());
        for value in ["Bearer garbage", foreign.as_str()] {
            let err = authenticate(&headers(value), &keys).unwrap_err();
            assert_eq!(message(err), INVALID_TOKEN);
        }
    }
}
