use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let access_secret: SecretString = matches
        .get_one("access-token-secret")
        .map(|s: &String| SecretString::from(s.clone()))
        .ok_or_else(|| anyhow!("missing required argument: --access-token-secret"))?;

    let refresh_secret: SecretString = matches
        .get_one("refresh-token-secret")
        .map(|s: &String| SecretString::from(s.clone()))
        .ok_or_else(|| anyhow!("missing required argument: --refresh-token-secret"))?;

    // A leaked access secret must not be replayable as a refresh secret.
    if access_secret.expose_secret() == refresh_secret.expose_secret() {
        return Err(anyhow!(
            "access and refresh token secrets must be distinct"
        ));
    }

    let frontend_url = matches
        .get_one("frontend-url")
        .map(|s: &String| s.to_string())
        .ok_or_else(|| anyhow!("missing argument: --frontend-url"))?;

    let mut globals = GlobalArgs::new(frontend_url, access_secret, refresh_secret);

    if let Some(ttl) = matches.get_one::<i64>("access-ttl").copied() {
        globals.access_ttl_seconds = ttl;
    }
    if let Some(ttl) = matches.get_one::<i64>("refresh-ttl").copied() {
        globals.refresh_ttl_seconds = ttl;
    }

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow!("missing required argument: --dsn"))?,
    };

    Ok((action, globals))
}
