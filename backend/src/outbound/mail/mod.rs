//! Delivery adapters for password-reset links.
//!
//! [`LoggingMailer`] writes links to the log and suits development;
//! [`WebhookMailer`] posts a JSON message to an outbound mail relay.

mod webhook;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailerError, PasswordResetMailer, ResetLinkMessage};

pub use webhook::WebhookMailer;

/// Subject line used for reset messages.
pub const RESET_SUBJECT: &str = "Password reset";

/// Mailer that logs the link instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailer;

#[async_trait]
impl PasswordResetMailer for LoggingMailer {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), MailerError> {
        info!(
            recipient = %message.recipient.as_ref(),
            link = %message.link,
            "password reset link (no mail relay configured)"
        );
        Ok(())
    }
}
