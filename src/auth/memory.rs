//! In-memory credential store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::store::{
    CredentialStore, InsertOutcome, NewUser, ResetTokenRecord, UserRecord,
};

#[derive(Default)]
struct Inner {
    users: HashMap<i64, UserRecord>,
    reset_tokens: Vec<ResetTokenRecord>,
    next_id: i64,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current reset token value for a user, if any.
    pub(crate) fn reset_token_for_tests(&self, user_id: i64) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .reset_tokens
            .iter()
            .find(|record| record.user_id == user_id)
            .map(|record| record.token.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<UserRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> anyhow::Result<Option<UserRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .find(|user| user.email_verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> anyhow::Result<InsertOutcome> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|user| user.email == new_user.email) {
            return Ok(InsertOutcome::DuplicateEmail);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = UserRecord {
            id: inner.next_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            role: new_user.role,
            is_email_verified: false,
            email_verification_token: Some(new_user.email_verification_token),
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(InsertOutcome::Created(user))
    }

    async fn mark_email_verified(&self, user_id: i64) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.is_email_verified = true;
            user.email_verification_token = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_verification_token(&self, user_id: i64, token: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.email_verification_token = Some(token.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_refresh_token_hash(
        &self,
        user_id: i64,
        hash: Option<&[u8]>,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.refresh_token_hash = hash.map(<[u8]>::to_vec);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn replace_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.reset_tokens.retain(|record| record.user_id != user_id);
        inner.reset_tokens.push(ResetTokenRecord {
            user_id,
            token: token.to_string(),
            expires_at,
        });
        Ok(())
    }

    async fn find_reset_token(&self, token: &str) -> anyhow::Result<Option<ResetTokenRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reset_tokens
            .iter()
            .find(|record| record.token == token)
            .cloned())
    }

    async fn delete_reset_token(&self, token: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.reset_tokens.retain(|record| record.token != token);
        Ok(())
    }

    async fn delete_reset_tokens_for(&self, user_id: i64) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.reset_tokens.retain(|record| record.user_id != user_id);
        Ok(())
    }
}
