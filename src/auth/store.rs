//! Credential store contract.
//!
//! The store is an external collaborator: this module owns only the
//! interface and the records crossing it. [`crate::auth::pg`] implements it
//! against Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::authz::Role;

/// Persisted identity record.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_email_verified: bool,
    /// At most one live verification token per user; overwritten on resend.
    pub email_verification_token: Option<String>,
    /// Single-slot hash of the current refresh token. Overwriting revokes
    /// the previous one.
    pub refresh_token_hash: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub email_verification_token: String,
}

/// Outcome of an insert attempt; duplicate email is a normal outcome, not an
/// infrastructure error.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(UserRecord),
    DuplicateEmail,
}

/// Password reset token, kept separate from the user row so a fresh request
/// can invalidate all prior tokens at once.
#[derive(Debug, Clone)]
pub struct ResetTokenRecord {
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<UserRecord>>;

    async fn find_by_verification_token(&self, token: &str)
        -> anyhow::Result<Option<UserRecord>>;

    async fn insert_user(&self, new_user: NewUser) -> anyhow::Result<InsertOutcome>;

    /// Mark the email verified and clear the verification token (single-use).
    async fn mark_email_verified(&self, user_id: i64) -> anyhow::Result<()>;

    /// Overwrite the verification token slot; old links stop working.
    async fn set_verification_token(&self, user_id: i64, token: &str) -> anyhow::Result<()>;

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> anyhow::Result<()>;

    /// Write the single refresh-token slot. `None` clears it (logout).
    async fn set_refresh_token_hash(
        &self,
        user_id: i64,
        hash: Option<&[u8]>,
    ) -> anyhow::Result<()>;

    /// Delete all prior reset tokens for the user and insert the new one,
    /// atomically.
    async fn replace_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    /// Look up a reset token by value; expired tokens are still returned and
    /// the caller decides (lazy deletion lives in the service).
    async fn find_reset_token(&self, token: &str) -> anyhow::Result<Option<ResetTokenRecord>>;

    async fn delete_reset_token(&self, token: &str) -> anyhow::Result<()>;

    async fn delete_reset_tokens_for(&self, user_id: i64) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_outcome_debug_names() {
        assert_eq!(
            format!("{:?}", InsertOutcome::DuplicateEmail),
            "DuplicateEmail"
        );
    }
}
