//! Login, refresh, and logout endpoints.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::error::auth_error_response;
use crate::api::AppState;

use super::guard::{bearer_token, require_auth};
use super::types::{LoginRequest, LoginResponse, TokenPairResponse, UserResponse};

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials or unverified email", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let principal = match state
        .auth
        .validate_credentials(&request.email, &request.password)
        .await
    {
        Ok(principal) => principal,
        Err(err) => return auth_error_response(&err).into_response(),
    };

    let tokens = match state.auth.issue_session(&principal).await {
        Ok(tokens) => tokens,
        Err(err) => return auth_error_response(&err).into_response(),
    };

    let response = LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        user: UserResponse {
            id: principal.user_id,
            email: principal.email.clone(),
            role: principal.primary_role(),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// The refresh endpoint expects the *refresh* token as the bearer, not the
/// access token.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    responses(
        (status = 200, description = "New token pair issued", body = TokenPairResponse),
        (status = 401, description = "Refresh token missing, invalid, or superseded", body = String)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn refresh(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(token) = bearer_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response();
    };

    let Ok(claims) = state.auth.verify_refresh(token) else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response();
    };

    match state.auth.rotate_session(claims.sub, token).await {
        Ok(tokens) => (
            StatusCode::OK,
            Json(TokenPairResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                token_type: "Bearer".to_string(),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 401, description = "Unauthorized", body = String)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<AppState>>) -> impl IntoResponse {
    let principal = match require_auth(&headers, &state) {
        Ok(principal) => principal,
        Err(rejection) => return rejection.into_response(),
    };

    match state.auth.end_session(principal.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state::lazy_state;
    use anyhow::Result;

    #[tokio::test]
    async fn login_missing_payload() -> Result<()> {
        let response = login(Extension(lazy_state()?), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_missing_bearer() -> Result<()> {
        let response = refresh(HeaderMap::new(), Extension(lazy_state()?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn logout_missing_bearer() -> Result<()> {
        let response = logout(HeaderMap::new(), Extension(lazy_state()?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
