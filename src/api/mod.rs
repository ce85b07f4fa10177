//! HTTP surface: router assembly and server startup.

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;

use crate::auth::config::{AuthConfig, TokenSecrets};
use crate::auth::pg::PgCredentialStore;
use crate::auth::AuthService;
use crate::authz::PermissionMap;

pub(crate) mod email;
pub(crate) mod error;
pub(crate) mod handlers;
mod openapi;

pub use openapi::openapi;

/// Shared state behind every handler.
pub struct AppState {
    pub auth: AuthService<PgCredentialStore>,
    pub permissions: PermissionMap,
}

/// Build the API router. State is injected as an [`Extension`] layer by the
/// caller.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/openapi.json", get(openapi::serve_openapi))
        .route("/v1/auth/login", post(handlers::auth::login::login))
        .route("/v1/auth/refresh", post(handlers::auth::login::refresh))
        .route("/v1/auth/logout", post(handlers::auth::login::logout))
        .route("/v1/auth/register", post(handlers::auth::register::register))
        .route(
            "/v1/auth/verify-email",
            get(handlers::auth::verification::verify_email),
        )
        .route(
            "/v1/auth/resend-verification",
            post(handlers::auth::verification::resend_verification),
        )
        .route(
            "/v1/auth/forgot-password",
            post(handlers::auth::password::forgot_password),
        )
        .route(
            "/v1/auth/reset-password",
            post(handlers::auth::password::reset_password),
        )
        .route("/v1/me", get(handlers::me::me))
        .route(
            "/v1/admin/permissions",
            get(handlers::admin::list_permissions),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn serve(
    port: u16,
    dsn: String,
    config: AuthConfig,
    secrets: TokenSecrets,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let frontend_origin = frontend_origin(config.frontend_base_url())?;

    let state = Arc::new(AppState {
        auth: AuthService::new(
            PgCredentialStore::new(pool),
            Arc::new(email::LogMailer),
            config,
            &secrets,
        ),
        permissions: PermissionMap::new(),
    });

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(frontend_origin))
        .allow_credentials(true);

    let app = router().layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &Request<Body>| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors)
            .layer(Extension(state)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;
    info!("Listening on port {port}");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = %path,
        request_id = %request_id,
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let url = Url::parse(frontend_base_url).context("Invalid frontend URL")?;
    let origin = url.origin().ascii_serialization();
    HeaderValue::from_str(&origin).map_err(|_| anyhow!("Invalid frontend origin"))
}
