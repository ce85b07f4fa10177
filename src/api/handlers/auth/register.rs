//! Registration endpoint.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::error::auth_error_response;
use crate::api::AppState;

use super::types::{RegisterRequest, UserResponse};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification email queued", body = UserResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 409, description = "Email already registered", body = String)
    ),
    tag = "auth"
)]
pub async fn register(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match state
        .auth
        .register(&request.email, &request.password, request.name.as_deref())
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(user))).into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state::lazy_state;
    use anyhow::Result;

    #[tokio::test]
    async fn register_missing_payload() -> Result<()> {
        let response = register(Extension(lazy_state()?), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
