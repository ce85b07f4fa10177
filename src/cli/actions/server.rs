use crate::api;
use crate::auth::config::{AuthConfig, TokenSecrets};
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, dsn } => {
            let secrets = TokenSecrets::new(
                globals.access_token_secret.clone(),
                globals.refresh_token_secret.clone(),
            );

            let config = AuthConfig::new(globals.frontend_url.clone())
                .with_access_ttl_seconds(globals.access_ttl_seconds)
                .with_refresh_ttl_seconds(globals.refresh_ttl_seconds);

            api::serve(port, dsn, config, secrets).await?;
        }
    }

    Ok(())
}
