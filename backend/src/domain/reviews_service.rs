//! Review use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{
    Operation, ResourceKind, authorize_object, authorize_request, require_principal,
};
use crate::domain::ads_service::{map_ad_error, map_review_error};
use crate::domain::ports::{AdRepository, ReviewRepository, ReviewsCommand, ReviewsQuery};
use crate::domain::{
    Error, NOT_FOUND, Principal, Review, ReviewDraft, ReviewId, ReviewPatch, ReviewText,
    ReviewValidationError,
};

/// Review service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewsService<R, A> {
    reviews: Arc<R>,
    ads: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R, A> ReviewsService<R, A> {
    /// Create a service over the given repositories.
    pub fn new(reviews: Arc<R>, ads: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            ads,
            clock,
        }
    }
}

fn validation_error(error: &ReviewValidationError) -> Error {
    Error::field_error(error.field(), error.to_string())
}

impl<R, A> ReviewsService<R, A>
where
    R: ReviewRepository,
    A: AdRepository,
{
    async fn load_authorized(
        &self,
        principal: Option<&Principal>,
        operation: Operation,
        id: ReviewId,
    ) -> Result<Review, Error> {
        authorize_request(ResourceKind::Review, operation, principal)?;
        let review = self
            .reviews
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        authorize_object(ResourceKind::Review, operation, principal, &review)?;
        Ok(review)
    }
}

#[async_trait]
impl<R, A> ReviewsQuery for ReviewsService<R, A>
where
    R: ReviewRepository,
    A: AdRepository,
{
    async fn list_reviews(&self, principal: Option<&Principal>) -> Result<Vec<Review>, Error> {
        authorize_request(ResourceKind::Review, Operation::List, principal)?;
        self.reviews.list().await.map_err(map_review_error)
    }

    async fn get_review(
        &self,
        principal: Option<&Principal>,
        id: ReviewId,
    ) -> Result<Review, Error> {
        self.load_authorized(principal, Operation::Retrieve, id)
            .await
    }
}

#[async_trait]
impl<R, A> ReviewsCommand for ReviewsService<R, A>
where
    R: ReviewRepository,
    A: AdRepository,
{
    async fn create_review(
        &self,
        principal: Option<&Principal>,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        let author = require_principal(ResourceKind::Review, Operation::Create, principal)?;
        let (text, ad) = draft.validate().map_err(|err| validation_error(&err))?;
        if self
            .ads
            .find_by_id(ad)
            .await
            .map_err(map_ad_error)?
            .is_none()
        {
            return Err(Error::field_error(
                "ad",
                format!("Invalid pk \"{ad}\" - object does not exist."),
            ));
        }
        let review = self
            .reviews
            .create(&text, ad, author.id, self.clock.utc())
            .await
            .map_err(map_review_error)?;
        info!(review = %review.id, %ad, author = %author.id, "review created");
        Ok(review)
    }

    async fn update_review(
        &self,
        principal: Option<&Principal>,
        id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Review, Error> {
        let current = self
            .load_authorized(principal, Operation::Update, id)
            .await?;
        let Some(raw) = patch.text else {
            return Ok(current);
        };
        let text = ReviewText::new(&raw).map_err(|err| validation_error(&err))?;
        self.reviews
            .update_text(id, &text)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete_review(
        &self,
        principal: Option<&Principal>,
        id: ReviewId,
    ) -> Result<(), Error> {
        self.load_authorized(principal, Operation::Delete, id)
            .await?;
        if self.reviews.delete(id).await.map_err(map_review_error)? {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[cfg(test)]
#[path = "reviews_service_tests.rs"]
mod tests;
