//! Outbound email abstraction.
//!
//! The core only decides *when* and *what* to send; transport belongs to an
//! external collaborator behind [`Mailer`]. Delivery failures never fail the
//! triggering operation: callers log and move on, and the user can re-run
//! the flow to supersede the token.

use anyhow::Result;
use serde_json::json;
use tracing::info;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub template: String,
    pub payload_json: String,
}

/// Email delivery abstraction.
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error for the caller to log.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev mailer that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            template = %message.template,
            payload = %message.payload_json,
            "email send stub"
        );
        Ok(())
    }
}

/// Build the frontend verification link included in outbound emails.
pub(crate) fn build_verify_url(frontend_base_url: &str, token: &str) -> String {
    let base = frontend_base_url.trim_end_matches('/');
    format!("{base}/verify-email?token={token}")
}

/// Build the frontend password-reset link.
pub(crate) fn build_reset_url(frontend_base_url: &str, token: &str) -> String {
    let base = frontend_base_url.trim_end_matches('/');
    format!("{base}/reset-password?token={token}")
}

pub(crate) fn verification_message(to_email: &str, verify_url: &str) -> Result<EmailMessage> {
    let payload = json!({
        "email": to_email,
        "verify_url": verify_url,
    });
    Ok(EmailMessage {
        to_email: to_email.to_string(),
        template: "verify_email".to_string(),
        payload_json: serde_json::to_string(&payload)?,
    })
}

pub(crate) fn reset_message(to_email: &str, reset_url: &str) -> Result<EmailMessage> {
    let payload = json!({
        "email": to_email,
        "reset_url": reset_url,
    });
    Ok(EmailMessage {
        to_email: to_email.to_string(),
        template: "reset_password".to_string(),
        payload_json: serde_json::to_string(&payload)?,
    })
}
