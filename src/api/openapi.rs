//! OpenAPI document for the auth surface.

use axum::response::{IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Entrata Auth API",
        description = "Authentication and authorization core for the Entrata event platform"
    ),
    paths(
        handlers::health::health,
        handlers::auth::login::login,
        handlers::auth::login::refresh,
        handlers::auth::login::logout,
        handlers::auth::register::register,
        handlers::auth::verification::verify_email,
        handlers::auth::verification::resend_verification,
        handlers::auth::password::forgot_password,
        handlers::auth::password::reset_password,
        handlers::me::me,
        handlers::admin::list_permissions,
    ),
    components(schemas(
        handlers::auth::types::LoginRequest,
        handlers::auth::types::LoginResponse,
        handlers::auth::types::TokenPairResponse,
        handlers::auth::types::RegisterRequest,
        handlers::auth::types::UserResponse,
        handlers::auth::types::VerifyEmailResponse,
        handlers::auth::types::ResendVerificationRequest,
        handlers::auth::types::ForgotPasswordRequest,
        handlers::auth::types::ResetPasswordRequest,
        handlers::auth::types::MessageResponse,
        handlers::me::MeResponse,
        handlers::admin::PermissionCatalog,
        handlers::admin::PermissionGroupView,
        handlers::admin::RoleGrantsView,
        crate::authz::Role,
        crate::authz::Permission,
    )),
    tags(
        (name = "auth", description = "Credential and token lifecycle"),
        (name = "me", description = "Authenticated principal"),
        (name = "admin", description = "Authorization administration"),
        (name = "health", description = "Service health")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// The generated document, for the `/openapi.json` route and tooling.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub(crate) async fn serve_openapi() -> impl IntoResponse {
    Json(openapi())
}
