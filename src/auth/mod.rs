//! Authentication core: password hashing, signed-token lifecycle, and the
//! email verification / password reset workflows.
//!
//! The [`service::AuthService`] orchestrates everything against a
//! [`store::CredentialStore`] (Postgres in production, in-memory in tests)
//! and a [`crate::api::email::Mailer`] for outbound notifications.

pub mod config;
pub mod hasher;
pub mod pg;
pub mod principal;
pub mod service;
pub mod store;
pub mod token;
pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod memory;

pub use config::{AuthConfig, TokenSecrets};
pub use principal::Principal;
pub use service::{AuthError, AuthService, ResendOutcome, SessionTokens, UserSummary, VerifyOutcome};
pub use token::{Claims, TokenCodec};
