//! Auth handlers and supporting modules.
//!
//! Login issues an access/refresh pair; refresh rotates the pair on every
//! use; the verification and reset flows run over single-use opaque tokens
//! delivered by email. Account-probing responses (resend, forgot-password)
//! are deliberately generic.

pub(crate) mod guard;
pub(crate) mod login;
pub(crate) mod password;
pub(crate) mod register;
pub(crate) mod types;
pub(crate) mod verification;

pub(crate) use guard::{require_auth, require_authorized};
