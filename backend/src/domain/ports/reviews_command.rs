//! Driving port for review mutations.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Review, ReviewDraft, ReviewId, ReviewPatch};

/// Write-side review use-cases.
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Review an existing ad as the caller.
    async fn create_review(
        &self,
        principal: Option<&Principal>,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Change the text of a review.
    async fn update_review(
        &self,
        principal: Option<&Principal>,
        id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Review, Error>;

    /// Remove a review.
    async fn delete_review(&self, principal: Option<&Principal>, id: ReviewId)
    -> Result<(), Error>;
}
