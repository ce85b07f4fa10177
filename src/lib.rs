//! Authentication and authorization core for the Entrata event platform.
//!
//! The crate exposes three layers:
//!
//! - [`auth`]: credential validation, signed-token lifecycle, and the
//!   out-of-band email verification / password reset workflows.
//! - [`authz`]: the role → permission map and the request guard evaluation.
//! - [`api`]: the axum surface the controller layer mounts.

pub mod api;
pub mod auth;
pub mod authz;
pub mod cli;
