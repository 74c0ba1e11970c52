//! Identity resolution middleware and extractor.
//!
//! Session issuance lives outside this codebase: callers arrive with a
//! bearer token minted by the gateway's auth service. This middleware
//! resolves that token to a user through the gateway once per request and
//! stashes the identity in request extensions; the dispatcher decides per
//! operation whether an identity is required.
//!
//! An invalid or expired token resolves to no identity rather than an
//! immediate rejection - public operations must keep working for a caller
//! whose token has lapsed.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::set_sentry_user;
use crate::gateway::{AuthUser, GatewayError};
use crate::state::AppState;

/// A resolved caller identity, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

/// Middleware that resolves the `Authorization: Bearer` token (if any) to a
/// caller identity via the gateway's auth endpoint.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.gateway().auth_user(&token).await {
            Ok(user) => {
                set_sentry_user(&user.id, user.email.as_deref());
                request.extensions_mut().insert(CurrentUser(user));
            }
            Err(GatewayError::AuthRejected) => {
                tracing::debug!("Bearer token rejected; continuing without identity");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Identity resolution failed; continuing without identity");
            }
        }
    }

    next.run(request).await
}

/// Extractor that optionally gets the resolved caller identity.
///
/// Never rejects; the dispatcher enforces per-operation authorization
/// tiers, so the HTTP layer only needs to carry the identity through.
pub struct OptionalUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .map(|current| current.0.clone());
        Ok(Self(user))
    }
}

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
    }
}
