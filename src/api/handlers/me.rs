//! Authenticated principal summary.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::authz::Role;

use super::auth::require_auth;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub roles: Vec<Role>,
}

/// Open to any authenticated principal: no role or permission requirements
/// are declared for this route.
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Current principal", body = MeResponse),
        (status = 401, description = "Unauthorized", body = String)
    ),
    security(("bearer" = [])),
    tag = "me"
)]
pub async fn me(headers: HeaderMap, state: Extension<Arc<AppState>>) -> impl IntoResponse {
    let principal = match require_auth(&headers, &state) {
        Ok(principal) => principal,
        Err(rejection) => return rejection.into_response(),
    };

    let response = MeResponse {
        id: principal.user_id,
        email: principal.email,
        roles: principal.roles.into_iter().collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state::lazy_state;
    use anyhow::Result;

    #[tokio::test]
    async fn me_requires_a_bearer_token() -> Result<()> {
        let response = me(HeaderMap::new(), Extension(lazy_state()?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
