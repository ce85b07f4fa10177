//! Small helpers for input validation and opaque token handling.

use anyhow::{Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Trim surrounding whitespace. Emails are case-sensitive as stored, so no
/// lowercasing here.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Create an opaque random token for email verification and password reset
/// links. 32 bytes of OS randomness, URL-safe encoded.
pub(crate) fn generate_opaque_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate opaque token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash a refresh token for the single-slot store.
/// Only the hash is persisted; a stolen database row cannot be replayed.
pub(crate) fn hash_refresh_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
