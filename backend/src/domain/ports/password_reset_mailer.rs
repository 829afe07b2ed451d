//! Driven port delivering password-reset links.
//!
//! The domain decides who receives a link and what it contains; adapters
//! only move the message (SMTP relay, webhook, or the log in development).

use async_trait::async_trait;

use crate::domain::Email;

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing a message to the delivery channel.
    pub enum MailerError {
        /// The channel refused or could not be reached.
        Delivery { message: String } => "reset link delivery failed: {message}",
    }
}

/// A reset link addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetLinkMessage {
    /// Registered address of the account owner.
    pub recipient: Email,
    /// Absolute link embedding the user id and token.
    pub link: String,
}

/// Outbound delivery of reset links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetMailer: Send + Sync {
    /// Send `message`; returns once the channel accepted it.
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), MailerError>;
}
