//! Email verification endpoints.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::error::auth_error_response;
use crate::api::AppState;
use crate::auth::{ResendOutcome, VerifyOutcome};

use super::types::{
    MessageResponse, ResendVerificationRequest, UserResponse, VerifyEmailParams,
    VerifyEmailResponse,
};

#[utoipa::path(
    get,
    path = "/v1/auth/verify-email",
    params(VerifyEmailParams),
    responses(
        (status = 200, description = "Email verified or already verified", body = VerifyEmailResponse),
        (status = 400, description = "Token missing, invalid, or expired", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    state: Extension<Arc<AppState>>,
    params: Query<VerifyEmailParams>,
) -> impl IntoResponse {
    let Some(token) = params.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    else {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    };

    match state.auth.verify_email(token).await {
        Ok(VerifyOutcome::Verified(user)) => (
            StatusCode::OK,
            Json(VerifyEmailResponse {
                message: "Email verified".to_string(),
                user: Some(UserResponse::from(user)),
            }),
        )
            .into_response(),
        Ok(VerifyOutcome::AlreadyVerified) => (
            StatusCode::OK,
            Json(VerifyEmailResponse {
                message: "Email already verified".to_string(),
                user: None,
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<ResendVerificationRequest>>,
) -> impl IntoResponse {
    let request: ResendVerificationRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match state.auth.resend_verification(&request.email).await {
        // Unknown accounts get the same answer as a real resend.
        Ok(ResendOutcome::Sent | ResendOutcome::Noop) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "If that account exists, a verification email has been sent"
                    .to_string(),
            }),
        )
            .into_response(),
        Ok(ResendOutcome::AlreadyVerified) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Email already verified".to_string(),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}
