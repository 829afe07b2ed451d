//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use classifieds::domain::DEFAULT_ADMIN_GROUP;
use classifieds::outbound::persistence::DbPool;
use pagination::DEFAULT_PAGE_SIZE;
use reqwest::Url;

/// Default base for reset links when none is configured.
pub const DEFAULT_RESET_BASE_URL: &str = "http://localhost:3000/password/reset/";

/// Settings consumed by the domain services.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub(crate) page_size: u32,
    pub(crate) admin_group: String,
    pub(crate) reset_base_url: String,
    pub(crate) mail_webhook_url: Option<Url>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            admin_group: DEFAULT_ADMIN_GROUP.to_owned(),
            reset_base_url: DEFAULT_RESET_BASE_URL.to_owned(),
            mail_webhook_url: None,
        }
    }
}

impl ServiceSettings {
    /// Default ad listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Group whose members act as administrators.
    #[must_use]
    pub fn with_admin_group(mut self, group: impl Into<String>) -> Self {
        self.admin_group = group.into();
        self
    }

    /// Prefix of the links mailed for password resets.
    #[must_use]
    pub fn with_reset_base_url(mut self, url: impl Into<String>) -> Self {
        self.reset_base_url = url.into();
        self
    }

    /// Relay receiving reset messages; links are logged when unset.
    #[must_use]
    pub fn with_mail_webhook(mut self, url: Option<Url>) -> Self {
        self.mail_webhook_url = url;
        self
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) services: ServiceSettings,
}

impl ServerConfig {
    /// Configuration backed by the in-memory store with default services.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            services: ServiceSettings::default(),
        }
    }

    /// Store data in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the service settings.
    #[must_use]
    pub fn with_services(mut self, services: ServiceSettings) -> Self {
        self.services = services;
        self
    }
}
