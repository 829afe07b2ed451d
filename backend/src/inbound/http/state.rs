//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{
    AdsCommand, AdsQuery, LoginService, PasswordResetCommand, ReviewsCommand, ReviewsQuery,
    UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub ads: Arc<dyn AdsQuery>,
    pub ads_command: Arc<dyn AdsCommand>,
    pub reviews: Arc<dyn ReviewsQuery>,
    pub reviews_command: Arc<dyn ReviewsCommand>,
    pub password_reset: Arc<dyn PasswordResetCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub ads: Arc<dyn AdsQuery>,
    pub ads_command: Arc<dyn AdsCommand>,
    pub reviews: Arc<dyn ReviewsQuery>,
    pub reviews_command: Arc<dyn ReviewsCommand>,
    pub password_reset: Arc<dyn PasswordResetCommand>,
    /// Ads per page when the client does not send `page_size`.
    pub page_size: u32,
}

impl HttpState {
    /// Override the default ad listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users,
            users_command,
            ads,
            ads_command,
            reviews,
            reviews_command,
            password_reset,
        } = ports;
        Self {
            login,
            users,
            users_command,
            ads,
            ads_command,
            reviews,
            reviews_command,
            password_reset,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
