//! Bearer-token extraction and the request guard entry points.
//!
//! Order matters: extract and verify the token, attach a principal, then
//! evaluate the declared requirements. A missing or bad token is 401; an
//! authenticated principal failing requirements is 403.

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};

use crate::api::error::denial_response;
use crate::api::AppState;
use crate::auth::Principal;
use crate::authz::{authorize, RouteRequirements};

/// Pull the bearer token out of the `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the access token and build the request principal.
pub(crate) fn require_auth(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<Principal, (StatusCode, String)> {
    let Some(token) = bearer_token(headers) else {
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
    };

    // Expired, malformed, and forged tokens all collapse to a generic 401.
    let claims = state
        .auth
        .verify_access(token)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

    Ok(Principal::from_claims(&claims))
}

/// Authenticate, then evaluate the route's declared requirements.
pub(crate) fn require_authorized(
    headers: &HeaderMap,
    state: &AppState,
    requirements: &RouteRequirements,
) -> Result<Principal, (StatusCode, String)> {
    let principal = require_auth(headers, state)?;

    authorize(Some(&principal), requirements, &state.permissions)
        .map_err(denial_response)?;

    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
