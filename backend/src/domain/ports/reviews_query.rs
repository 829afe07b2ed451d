//! Driving port for reading reviews.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Review, ReviewId};

/// Read-side review use-cases.
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Every review, oldest first.
    async fn list_reviews(&self, principal: Option<&Principal>) -> Result<Vec<Review>, Error>;

    /// A single review, visible to its author and administrators.
    async fn get_review(
        &self,
        principal: Option<&Principal>,
        id: ReviewId,
    ) -> Result<Review, Error>;
}
