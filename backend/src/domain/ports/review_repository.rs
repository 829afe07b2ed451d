//! Port for review persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdId, Review, ReviewId, ReviewText, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The referenced ad disappeared before the insert landed.
        MissingAd { ad_id: i64 } => "ad {ad_id} does not exist",
    }
}

/// Storage for reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review of `ad` authored by `author`.
    async fn create(
        &self,
        text: &ReviewText,
        ad: AdId,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Review, ReviewPersistenceError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// All reviews in insertion order.
    async fn list(&self) -> Result<Vec<Review>, ReviewPersistenceError>;

    /// Replace the body of a review.
    async fn update_text(
        &self,
        id: ReviewId,
        text: &ReviewText,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Remove a review; `false` when it did not exist.
    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError>;

    /// Remove every review of `ad`, returning how many went.
    async fn delete_for_ad(&self, ad: AdId) -> Result<u64, ReviewPersistenceError>;
}
