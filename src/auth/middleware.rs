// Authentication middleware for protected routes
//
// Per request: Unauthenticated -> TokenExtracted -> Validated -> Authorized | Rejected.
// Ownership is not decided here; each mutating operation calls `ensure_owner`.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRef, FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    token::{extract_token, TokenService},
};

/// Identity of the caller, established from a validated session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Run the token pipeline against request headers
///
/// A missing or malformed header produces an empty token, which fails
/// validation like any other bad token.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let raw_token = extract_token(header_value);
    let user_id = tokens.extract_subject(raw_token)?;

    Ok(AuthenticatedUser { user_id })
}

/// Route layer for endpoints that require authentication
///
/// Rejects with 401 before the wrapped handler runs; on success the caller
/// identity is stored in the request extensions for `AuthenticatedUser`.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(request.headers(), &tokens).map_err(|e| {
        warn!("Rejected unauthenticated request to {}", request.uri().path());
        e
    })?;

    debug!(
        "Authenticated user_id={} for endpoint={}",
        user.user_id,
        request.uri().path()
    );
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already established by `require_auth`
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(*user);
        }

        let tokens = TokenService::from_ref(state);
        authenticate(&parts.headers, &tokens)
    }
}

/// Per-operation ownership check performed before any mutation
pub fn ensure_owner(caller_id: Uuid, owner_id: Uuid, message: &str) -> Result<(), AuthError> {
    if caller_id != owner_id {
        warn!("Ownership check failed: caller={} owner={}", caller_id, owner_id);
        return Err(AuthError::Forbidden(message.to_string()));
    }
    Ok(())
}
