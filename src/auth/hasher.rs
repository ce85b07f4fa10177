//! One-way salted password hashing with Argon2id.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password.
///
/// A fresh random salt is generated per call and embedded in the PHC-format
/// output, so no separate salt storage is needed.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash is "does not match", never an error: the caller
/// must not be able to distinguish corrupt state from a wrong password.
#[must_use]
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn hash_then_verify_round_trips() -> Result<()> {
        let hashed = hash_password("pw123456")?;
        assert!(verify_password("pw123456", &hashed));
        assert!(!verify_password("pw1234567", &hashed));
        Ok(())
    }

    #[test]
    fn hashes_are_salted_per_call() -> Result<()> {
        let first = hash_password("pw123456")?;
        let second = hash_password("pw123456")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("pw123456", "not-a-phc-string"));
        assert!(!verify_password("pw123456", ""));
    }
}
