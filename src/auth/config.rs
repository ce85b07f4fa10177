//! Auth configuration and signing secrets.

use secrecy::SecretString;

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

/// The two independent signing secrets.
///
/// Distinct secrets keep a leaked access-token secret from being replayed
/// against the refresh endpoint. There are deliberately no defaults: callers
/// must provide both or the process never gets this far.
#[derive(Clone)]
pub struct TokenSecrets {
    access: SecretString,
    refresh: SecretString,
}

impl TokenSecrets {
    #[must_use]
    pub fn new(access: SecretString, refresh: SecretString) -> Self {
        Self { access, refresh }
    }

    #[must_use]
    pub fn access(&self) -> &SecretString {
        &self.access
    }

    #[must_use]
    pub fn refresh(&self) -> &SecretString {
        &self.refresh
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    reset_token_ttl_seconds: i64,
    min_password_len: usize,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            reset_token_ttl_seconds: DEFAULT_RESET_TOKEN_TTL_SECONDS,
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }

    #[must_use]
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_reset_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.reset_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_min_password_len(mut self, len: usize) -> Self {
        self.min_password_len = len;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    #[must_use]
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    #[must_use]
    pub fn reset_token_ttl_seconds(&self) -> i64 {
        self.reset_token_ttl_seconds
    }

    #[must_use]
    pub fn min_password_len(&self) -> usize {
        self.min_password_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://events.example.com".to_string());

        assert_eq!(config.frontend_base_url(), "https://events.example.com");
        assert_eq!(config.access_ttl_seconds(), DEFAULT_ACCESS_TTL_SECONDS);
        assert_eq!(config.refresh_ttl_seconds(), DEFAULT_REFRESH_TTL_SECONDS);
        assert_eq!(
            config.reset_token_ttl_seconds(),
            DEFAULT_RESET_TOKEN_TTL_SECONDS
        );
        assert_eq!(config.min_password_len(), DEFAULT_MIN_PASSWORD_LEN);

        let config = config
            .with_access_ttl_seconds(60)
            .with_refresh_ttl_seconds(120)
            .with_reset_token_ttl_seconds(30)
            .with_min_password_len(12);

        assert_eq!(config.access_ttl_seconds(), 60);
        assert_eq!(config.refresh_ttl_seconds(), 120);
        assert_eq!(config.reset_token_ttl_seconds(), 30);
        assert_eq!(config.min_password_len(), 12);
    }
}
