//! Port for ad persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Ad, AdContent, AdFilter, AdId, AdSlice, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ad repository adapters.
    pub enum AdPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ad repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ad repository query failed: {message}",
    }
}

/// Storage for ads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Insert an ad authored by `author`.
    async fn create(
        &self,
        content: &AdContent,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Ad, AdPersistenceError>;

    /// Fetch an ad by identifier.
    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdPersistenceError>;

    /// One window of the listing, newest first, plus the filtered total.
    async fn list(
        &self,
        filter: &AdFilter,
        offset: u64,
        limit: u64,
    ) -> Result<AdSlice, AdPersistenceError>;

    /// Overwrite the editable fields. `created_at` and `author` never change.
    async fn update(&self, id: AdId, content: &AdContent)
    -> Result<Option<Ad>, AdPersistenceError>;

    /// Remove an ad; `false` when it did not exist.
    async fn delete(&self, id: AdId) -> Result<bool, AdPersistenceError>;
}
