//! Outbound mail seam.
//!
//! The API only needs to deliver one-time codes, so the trait stays narrow.
//! Production wires an SMTP implementation; tests and local development use
//! [`LogMailer`], which writes the code to the log instead of sending it.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail send failed: {0}")]
    Send(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a one-time code to the given address.
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), MailError>;
}

/// Mailer that logs instead of sending. The code appears in the log so
/// local flows can be completed without a mailbox.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), MailError> {
        info!(to, code, "one-time code issued (log mailer)");
        Ok(())
    }
}
