//! Reqwest-backed mail relay adapter.
//!
//! Posts `{"to", "subject", "text"}` to a configured endpoint and treats any
//! non-2xx answer as a delivery failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::RESET_SUBJECT;
use crate::domain::ports::{MailerError, PasswordResetMailer, ResetLinkMessage};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const PREVIEW_CHAR_LIMIT: usize = 160;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    to: &'a str,
    subject: &'a str,
    text: String,
}

impl<'a> RelayMessage<'a> {
    fn for_reset(message: &'a ResetLinkMessage) -> Self {
        Self {
            to: message.recipient.as_ref(),
            subject: RESET_SUBJECT,
            text: format!(
                "Follow this link to choose a new password:\n{}\n",
                message.link
            ),
        }
    }
}

/// Mailer posting reset messages to an HTTP relay.
pub struct WebhookMailer {
    client: Client,
    endpoint: Url,
}

impl WebhookMailer {
    /// Build a mailer for `endpoint` with a ten second request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PasswordResetMailer for WebhookMailer {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RelayMessage::for_reset(message))
            .send()
            .await
            .map_err(|error| MailerError::delivery(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        debug!(status = status.as_u16(), "mail relay rejected reset message");
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        preview.push_str("...");
    }
    if preview.is_empty() {
        MailerError::delivery(format!("relay answered {}", status.as_u16()))
    } else {
        MailerError::delivery(format!("relay answered {}: {preview}", status.as_u16()))
    }
}
