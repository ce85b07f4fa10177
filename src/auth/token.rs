//! Signed, self-contained, expiring tokens.
//!
//! Access and refresh tokens share the same claim shape but are signed with
//! independent secrets: two [`TokenCodec`] instances, never one.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::authz::Role;

/// Claim set carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Unique token id. Two tokens for the same subject are never
    /// byte-identical, even when issued within the same second.
    pub jti: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature mismatch, malformed structure, or expiry in the past.
    /// Verification fails closed; the cause is deliberately not split out.
    #[error("invalid or expired token")]
    Invalid,
}

/// Signs and verifies tokens for one secret/TTL pair.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
    validation: Validation,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would let expired tokens
        // linger past their advertised lifetime.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl_seconds,
            validation,
        }
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Sign a token for the given subject, expiring `ttl_seconds` from now.
    pub fn issue(&self, sub: i64, email: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(Utc::now(), sub, email, role)
    }

    pub(crate) fn issue_at(
        &self,
        now: DateTime<Utc>,
        sub: i64,
        email: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
            jti: Ulid::new().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims.
    ///
    /// Fails closed: any signature, structure, or expiry problem is
    /// [`TokenError::Invalid`], never a partial result.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
