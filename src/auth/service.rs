//! Credential validation, session lifecycle, and the verification / reset
//! workflows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::error;

use crate::api::email::{
    build_reset_url, build_verify_url, reset_message, verification_message, Mailer,
};
use crate::auth::config::{AuthConfig, TokenSecrets};
use crate::auth::principal::Principal;
use crate::auth::store::{CredentialStore, InsertOutcome, NewUser, UserRecord};
use crate::auth::token::{Claims, TokenCodec, TokenError};
use crate::auth::{hasher, utils};
use crate::authz::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or wrong password; callers never learn which.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Deliberately distinct from invalid credentials so the client can
    /// offer a resend-verification action.
    #[error("email not verified")]
    EmailNotVerified,
    /// Refresh token missing, superseded, reused after logout, or forged.
    #[error("access denied")]
    AccessDenied,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::InvalidToken
    }
}

/// Access/refresh pair returned by login and refresh.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Public summary of a user; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl UserSummary {
    fn from_record(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified(UserSummary),
    AlreadyVerified,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    AlreadyVerified,
    /// Unknown account. Callers answer with the same generic message as
    /// [`ResendOutcome::Sent`] to avoid account probing.
    Noop,
}

pub struct AuthService<S> {
    store: S,
    mailer: Arc<dyn Mailer>,
    config: AuthConfig,
    access: TokenCodec,
    refresh: TokenCodec,
}

impl<S: CredentialStore> AuthService<S> {
    #[must_use]
    pub fn new(store: S, mailer: Arc<dyn Mailer>, config: AuthConfig, secrets: &TokenSecrets) -> Self {
        let access = TokenCodec::new(secrets.access(), config.access_ttl_seconds());
        let refresh = TokenCodec::new(secrets.refresh(), config.refresh_ttl_seconds());
        Self {
            store,
            mailer,
            config,
            access,
            refresh,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn store_for_tests(&self) -> &S {
        &self.store
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.access.verify(token)?)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.refresh.verify(token)?)
    }

    /// Check an email/password pair against the store.
    ///
    /// Unknown email and wrong password are the same failure. A matching
    /// password on an unverified account is reported distinctly.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let email = utils::normalize_email(email);
        let Some(user) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !hasher::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        Ok(Principal::new(user.id, user.email, user.role))
    }

    /// Issue a fresh access/refresh pair and persist the refresh hash,
    /// revoking whatever refresh token was in the slot before.
    pub async fn issue_session(&self, principal: &Principal) -> Result<SessionTokens, AuthError> {
        let role = principal.primary_role();
        // Independent signing operations; wait for both before persisting.
        let (access_token, refresh_token) = tokio::try_join!(
            async { self.access.issue(principal.user_id, &principal.email, role) },
            async { self.refresh.issue(principal.user_id, &principal.email, role) },
        )?;

        let hash = utils::hash_refresh_token(&refresh_token);
        self.store
            .set_refresh_token_hash(principal.user_id, Some(&hash))
            .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Rotation-on-use: verify the presented token against the stored hash,
    /// then overwrite the slot with a new pair. The presented token is dead
    /// either way.
    pub async fn rotate_session(
        &self,
        user_id: i64,
        presented_refresh_token: &str,
    ) -> Result<SessionTokens, AuthError> {
        let Some(user) = self.store.find_by_id(user_id).await? else {
            return Err(AuthError::AccessDenied);
        };

        let Some(stored_hash) = user.refresh_token_hash.as_deref() else {
            return Err(AuthError::AccessDenied);
        };

        if utils::hash_refresh_token(presented_refresh_token) != stored_hash {
            return Err(AuthError::AccessDenied);
        }

        let principal = Principal::new(user.id, user.email, user.role);
        self.issue_session(&principal).await
    }

    /// Clear the refresh-token slot. Idempotent.
    pub async fn end_session(&self, user_id: i64) -> Result<(), AuthError> {
        self.store.set_refresh_token_hash(user_id, None).await?;
        Ok(())
    }

    /// Create an unverified account and send the verification email.
    ///
    /// A delivery failure is logged, never surfaced: the account exists and
    /// verification can be retried via resend.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserSummary, AuthError> {
        let email = utils::normalize_email(email);
        if !utils::valid_email(&email) {
            return Err(AuthError::Validation("invalid email address".to_string()));
        }
        self.check_password_policy(password)?;

        let password_hash = hasher::hash_password(password)?;
        let token = utils::generate_opaque_token()?;

        let outcome = self
            .store
            .insert_user(NewUser {
                email: email.clone(),
                password_hash,
                display_name: display_name.map(str::to_string),
                role: Role::Attendee,
                email_verification_token: token.clone(),
            })
            .await?;

        let user = match outcome {
            InsertOutcome::Created(user) => user,
            InsertOutcome::DuplicateEmail => return Err(AuthError::EmailTaken),
        };

        self.send_verification_email(&email, &token);

        Ok(UserSummary::from_record(&user))
    }

    /// Consume a verification token. Single-use: the token is cleared when
    /// the account flips to verified.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyOutcome, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let Some(user) = self.store.find_by_verification_token(token).await? else {
            return Err(AuthError::InvalidToken);
        };

        if user.is_email_verified {
            return Ok(VerifyOutcome::AlreadyVerified);
        }

        self.store.mark_email_verified(user.id).await?;

        Ok(VerifyOutcome::Verified(UserSummary::from_record(&user)))
    }

    /// Overwrite the verification token slot and resend the email. Old
    /// links stop working.
    pub async fn resend_verification(&self, email: &str) -> Result<ResendOutcome, AuthError> {
        let email = utils::normalize_email(email);
        let Some(user) = self.store.find_by_email(&email).await? else {
            return Ok(ResendOutcome::Noop);
        };

        if user.is_email_verified {
            return Ok(ResendOutcome::AlreadyVerified);
        }

        let token = utils::generate_opaque_token()?;
        self.store.set_verification_token(user.id, &token).await?;
        self.send_verification_email(&email, &token);

        Ok(ResendOutcome::Sent)
    }

    /// Start a password reset. Callers answer with the same generic message
    /// whether or not the account exists.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = utils::normalize_email(email);
        let Some(user) = self.store.find_by_email(&email).await? else {
            return Ok(());
        };

        let token = utils::generate_opaque_token()?;
        let expires_at = Utc::now() + Duration::seconds(self.config.reset_token_ttl_seconds());
        // Prior tokens die with the insert; only the newest link works.
        self.store
            .replace_reset_token(user.id, &token, expires_at)
            .await?;

        let reset_url = build_reset_url(self.config.frontend_base_url(), &token);
        match reset_message(&email, &reset_url) {
            Ok(message) => {
                if let Err(err) = self.mailer.send(&message) {
                    error!("Failed to send password reset email: {err}");
                }
            }
            Err(err) => error!("Failed to build password reset email: {err}"),
        }

        Ok(())
    }

    /// Consume a reset token and set the new password. All reset tokens for
    /// the user are deleted on success.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.check_password_policy(new_password)?;

        let Some(record) = self.store.find_reset_token(token).await? else {
            return Err(AuthError::InvalidToken);
        };

        if record.expires_at <= Utc::now() {
            // Lazy deletion: expired tokens disappear on lookup.
            self.store.delete_reset_token(token).await?;
            return Err(AuthError::InvalidToken);
        }

        let password_hash = hasher::hash_password(new_password)?;
        self.store
            .set_password_hash(record.user_id, &password_hash)
            .await?;
        self.store.delete_reset_tokens_for(record.user_id).await?;

        Ok(())
    }

    fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        let min = self.config.min_password_len();
        if password.len() < min {
            return Err(AuthError::Validation(format!(
                "password must be at least {min} characters"
            )));
        }
        Ok(())
    }

    fn send_verification_email(&self, email: &str, token: &str) {
        let verify_url = build_verify_url(self.config.frontend_base_url(), token);
        match verification_message(email, &verify_url) {
            Ok(message) => {
                if let Err(err) = self.mailer.send(&message) {
                    error!("Failed to send verification email: {err}");
                }
            }
            Err(err) => error!("Failed to build verification email: {err}"),
        }
    }
}
