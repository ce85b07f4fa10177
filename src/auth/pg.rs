//! Postgres-backed credential store.
//!
//! Schema lives in `sql/schema.sql`. Every query runs inside a `db.query`
//! span so slow statements show up in traces.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;

use crate::auth::store::{
    CredentialStore, InsertOutcome, NewUser, ResetTokenRecord, UserRecord,
};
use crate::authz::Role;

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, display_name, role, is_email_verified, \
     email_verification_token, refresh_token_hash, created_at, updated_at";

fn user_from_row(row: &PgRow) -> Result<UserRecord> {
    let role: String = row.get("role");
    Ok(UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        display_name: row.get("display_name"),
        role: role.parse::<Role>().context("unknown role in users.role")?,
        is_email_verified: row.get("is_email_verified"),
        email_verification_token: row.get("email_verification_token"),
        refresh_token_hash: row.get("refresh_token_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

async fn fetch_user(pool: &PgPool, query: String, bind: &str) -> Result<Option<UserRecord>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(bind)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch user")?;

    row.as_ref().map(user_from_row).transpose()
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        fetch_user(&self.pool, query, email).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = %query
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch user by id")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<UserRecord>> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE email_verification_token = $1");
        fetch_user(&self.pool, query, token).await
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<InsertOutcome> {
        let query = format!(
            r"
            INSERT INTO users
                (email, password_hash, display_name, role, email_verification_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = %query
        );
        let row = sqlx::query(&query)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.display_name)
            .bind(new_user.role.as_str())
            .bind(&new_user.email_verification_token)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(InsertOutcome::Created(user_from_row(&row)?)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::DuplicateEmail),
            Err(err) => Err(err).context("failed to insert user"),
        }
    }

    async fn mark_email_verified(&self, user_id: i64) -> Result<()> {
        // Verification is single-use: flag and token flip together.
        let query = r"
            UPDATE users
            SET is_email_verified = TRUE,
                email_verification_token = NULL,
                updated_at = NOW()
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to mark email verified")?;
        Ok(())
    }

    async fn set_verification_token(&self, user_id: i64, token: &str) -> Result<()> {
        let query = r"
            UPDATE users
            SET email_verification_token = $2,
                updated_at = NOW()
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to set verification token")?;
        Ok(())
    }

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()> {
        let query = r"
            UPDATE users
            SET password_hash = $2,
                updated_at = NOW()
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to set password hash")?;
        Ok(())
    }

    async fn set_refresh_token_hash(&self, user_id: i64, hash: Option<&[u8]>) -> Result<()> {
        let query = r"
            UPDATE users
            SET refresh_token_hash = $2,
                updated_at = NOW()
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(hash)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to set refresh token hash")?;
        Ok(())
    }

    async fn replace_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        // Delete-then-insert in one transaction: a fresh request invalidates
        // every prior token for the user.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("begin reset token transaction")?;

        let query = "DELETE FROM password_reset_tokens WHERE user_id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .execute(&mut *tx)
            .instrument(span)
            .await
            .context("failed to delete prior reset tokens")?;

        let query = r"
            INSERT INTO password_reset_tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .execute(&mut *tx)
            .instrument(span)
            .await
            .context("failed to insert reset token")?;

        tx.commit().await.context("commit reset token transaction")
    }

    async fn find_reset_token(&self, token: &str) -> Result<Option<ResetTokenRecord>> {
        let query = r"
            SELECT user_id, token, expires_at
            FROM password_reset_tokens
            WHERE token = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch reset token")?;

        Ok(row.map(|row| ResetTokenRecord {
            user_id: row.get("user_id"),
            token: row.get("token"),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn delete_reset_token(&self, token: &str) -> Result<()> {
        let query = "DELETE FROM password_reset_tokens WHERE token = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete reset token")?;
        Ok(())
    }

    async fn delete_reset_tokens_for(&self, user_id: i64) -> Result<()> {
        let query = "DELETE FROM password_reset_tokens WHERE user_id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete reset tokens for user")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_matches_sqlstate() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn user_columns_cover_record_fields() {
        for column in [
            "id",
            "email",
            "password_hash",
            "display_name",
            "role",
            "is_email_verified",
            "email_verification_token",
            "refresh_token_hash",
            "created_at",
            "updated_at",
        ] {
            assert!(USER_COLUMNS.contains(column), "missing column {column}");
        }
    }
}
