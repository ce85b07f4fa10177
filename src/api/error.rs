//! Error-to-response mapping for the controller surface.
//!
//! Authentication failures collapse to a generic 401 so callers cannot probe
//! which part of a credential was wrong; "email not verified" is the one
//! deliberate exception. Authorization failures are 403, distinct from 401.

use axum::http::StatusCode;
use tracing::error;

use crate::auth::AuthError;
use crate::authz::Denial;

pub(crate) fn auth_error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidCredentials | AuthError::AccessDenied => {
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        }
        AuthError::EmailNotVerified => {
            (StatusCode::UNAUTHORIZED, "Email not verified".to_string())
        }
        AuthError::EmailTaken => (
            StatusCode::CONFLICT,
            "Email already registered".to_string(),
        ),
        AuthError::InvalidToken => (
            StatusCode::BAD_REQUEST,
            "Invalid or expired token".to_string(),
        ),
        AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::Internal(err) => {
            error!("Internal auth error: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

pub(crate) fn denial_response(denial: Denial) -> (StatusCode, String) {
    match denial {
        Denial::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        Denial::MissingRole | Denial::MissingPermission => {
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn credential_failures_are_indistinguishable() {
        let (status_a, body_a) = auth_error_response(&AuthError::InvalidCredentials);
        let (status_b, body_b) = auth_error_response(&AuthError::AccessDenied);
        assert_eq!((status_a, &body_a), (status_b, &body_b));
        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn email_not_verified_is_surfaced_distinctly() {
        let (status, body) = auth_error_response(&AuthError::EmailNotVerified);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Email not verified");
    }

    #[test]
    fn conflict_and_validation_statuses() {
        let (status, _) = auth_error_response(&AuthError::EmailTaken);
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) =
            auth_error_response(&AuthError::Validation("too short".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "too short");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let (status, body) = auth_error_response(&AuthError::Internal(anyhow!("pool exhausted")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("pool"));
    }

    #[test]
    fn denial_statuses_split_401_from_403() {
        assert_eq!(
            denial_response(Denial::Unauthenticated).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(denial_response(Denial::MissingRole).0, StatusCode::FORBIDDEN);
        assert_eq!(
            denial_response(Denial::MissingPermission).0,
            StatusCode::FORBIDDEN
        );
    }
}
