use secrecy::SecretString;

/// Startup configuration shared across actions.
///
/// Signing secrets live here as [`SecretString`] so they never show up in
/// debug output or logs. There are no default values: missing secrets stop
/// the process at argument parsing.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub frontend_url: String,
    pub access_token_secret: SecretString,
    pub refresh_token_secret: SecretString,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(
        frontend_url: String,
        access_token_secret: SecretString,
        refresh_token_secret: SecretString,
    ) -> Self {
        Self {
            frontend_url,
            access_token_secret,
            refresh_token_secret,
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 604_800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "http://localhost:3000".to_string(),
            SecretString::from("access".to_string()),
            SecretString::from("refresh".to_string()),
        );
        assert_eq!(args.frontend_url, "http://localhost:3000");
        assert_eq!(args.access_token_secret.expose_secret(), "access");
        assert_eq!(args.refresh_token_secret.expose_secret(), "refresh");
        assert_eq!(args.access_ttl_seconds, 900);
        assert_eq!(args.refresh_ttl_seconds, 604_800);
    }
}
