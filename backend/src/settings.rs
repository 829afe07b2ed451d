//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CLASSIFIEDS_*` environment variables and an
//! optional configuration file, in ortho_config's usual precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use reqwest::Url;
use serde::Deserialize;

use crate::server::DEFAULT_RESET_BASE_URL;
use classifieds::domain::DEFAULT_ADMIN_GROUP;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLASSIFIEDS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Default ads per listing page.
    pub page_size: Option<u32>,
    /// Group whose members are administrators.
    pub admin_group: Option<String>,
    /// Prefix of emailed password-reset links.
    pub reset_base_url: Option<String>,
    /// Mail relay endpoint; reset links are logged when unset.
    pub mail_webhook_url: Option<String>,
}

/// A setting that is present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not `host:port`.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    /// `mail_webhook_url` is not an absolute URL.
    #[error("invalid mail webhook URL {value:?}: {source}")]
    WebhookUrl {
        value: String,
        source: url::ParseError,
    },
}

impl AppSettings {
    /// Listening address, defaulting to all interfaces on port 8080.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] for unparseable addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Listing page size clamped into `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Administrator group name.
    pub fn admin_group(&self) -> &str {
        self.admin_group.as_deref().unwrap_or(DEFAULT_ADMIN_GROUP)
    }

    /// Reset link prefix.
    pub fn reset_base_url(&self) -> &str {
        self.reset_base_url
            .as_deref()
            .unwrap_or(DEFAULT_RESET_BASE_URL)
    }

    /// Parsed mail relay endpoint, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WebhookUrl`] for malformed URLs.
    pub fn mail_webhook_url(&self) -> Result<Option<Url>, SettingsError> {
        self.mail_webhook_url
            .as_deref()
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::WebhookUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }
}
