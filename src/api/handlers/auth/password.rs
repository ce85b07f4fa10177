//! Password reset endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::error::auth_error_response;
use crate::api::AppState;

use super::types::{ForgotPasswordRequest, MessageResponse, ResetPasswordRequest};

const FORGOT_PASSWORD_MESSAGE: &str =
    "If this account exists, a password reset email has been sent";

#[utoipa::path(
    post,
    path = "/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> impl IntoResponse {
    let request: ForgotPasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    // The response shape is identical whether or not the account exists.
    match state.auth.forgot_password(&request.email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: FORGOT_PASSWORD_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Password too short or token invalid/expired", body = String)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> impl IntoResponse {
    let request: ResetPasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match state
        .auth
        .reset_password(&request.token, &request.new_password)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Password updated".to_string(),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state::lazy_state;
    use anyhow::Result;

    #[tokio::test]
    async fn forgot_password_missing_payload() -> Result<()> {
        let response = forgot_password(Extension(lazy_state()?), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_missing_payload() -> Result<()> {
        let response = reset_password(Extension(lazy_state()?), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
