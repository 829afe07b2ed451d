//! Ad use-cases.
//!
//! Implements [`AdsQuery`] and [`AdsCommand`] over an [`AdRepository`]. The
//! review repository is needed only to remove an ad's reviews before the ad
//! itself goes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::info;

use crate::domain::access::{
    Operation, ResourceKind, authorize_object, authorize_request, require_principal,
};
use crate::domain::ports::{
    AdPersistenceError, AdRepository, AdsCommand, AdsQuery, ReviewPersistenceError,
    ReviewRepository,
};
use crate::domain::{
    Ad, AdDraft, AdFilter, AdId, AdPatch, AdSlice, AdValidationError, Error, NOT_FOUND, Principal,
};

/// Ad service implementing the ad driving ports.
#[derive(Clone)]
pub struct AdsService<A, R> {
    ads: Arc<A>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<A, R> AdsService<A, R> {
    /// Create a service over the given repositories.
    pub fn new(ads: Arc<A>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ads,
            reviews,
            clock,
        }
    }
}

pub(crate) fn map_ad_error(error: AdPersistenceError) -> Error {
    match error {
        AdPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ad repository unavailable: {message}"))
        }
        AdPersistenceError::Query { message } => {
            Error::internal(format!("ad repository error: {message}"))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::MissingAd { ad_id } => {
            Error::field_error("ad", format!("Invalid pk \"{ad_id}\" - object does not exist."))
        }
    }
}

fn validation_error(error: &AdValidationError) -> Error {
    Error::field_error(error.field(), error.to_string())
}

impl<A, R> AdsService<A, R>
where
    A: AdRepository,
    R: ReviewRepository,
{
    async fn load(&self, id: AdId) -> Result<Ad, Error> {
        self.ads
            .find_by_id(id)
            .await
            .map_err(map_ad_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    /// Pre-check, load, then object check, in that order.
    async fn load_authorized(
        &self,
        principal: Option<&Principal>,
        operation: Operation,
        id: AdId,
    ) -> Result<Ad, Error> {
        authorize_request(ResourceKind::Ad, operation, principal)?;
        let ad = self.load(id).await?;
        authorize_object(ResourceKind::Ad, operation, principal, &ad)?;
        Ok(ad)
    }
}

#[async_trait]
impl<A, R> AdsQuery for AdsService<A, R>
where
    A: AdRepository,
    R: ReviewRepository,
{
    async fn list_ads(&self, filter: &AdFilter, page: PageRequest) -> Result<AdSlice, Error> {
        self.ads
            .list(filter, page.offset(), page.limit())
            .await
            .map_err(map_ad_error)
    }

    async fn get_ad(&self, principal: Option<&Principal>, id: AdId) -> Result<Ad, Error> {
        self.load_authorized(principal, Operation::Retrieve, id).await
    }
}

#[async_trait]
impl<A, R> AdsCommand for AdsService<A, R>
where
    A: AdRepository,
    R: ReviewRepository,
{
    async fn create_ad(
        &self,
        principal: Option<&Principal>,
        draft: AdDraft,
    ) -> Result<Ad, Error> {
        let author = require_principal(ResourceKind::Ad, Operation::Create, principal)?;
        let content = draft.validate().map_err(|err| validation_error(&err))?;
        let ad = self
            .ads
            .create(&content, author.id, self.clock.utc())
            .await
            .map_err(map_ad_error)?;
        info!(ad = %ad.id, author = %author.id, "ad created");
        Ok(ad)
    }

    async fn update_ad(
        &self,
        principal: Option<&Principal>,
        id: AdId,
        patch: AdPatch,
    ) -> Result<Ad, Error> {
        let current = self.load_authorized(principal, Operation::Update, id).await?;
        let content = patch
            .apply_to(&current)
            .map_err(|err| validation_error(&err))?;
        self.ads
            .update(id, &content)
            .await
            .map_err(map_ad_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete_ad(&self, principal: Option<&Principal>, id: AdId) -> Result<(), Error> {
        self.load_authorized(principal, Operation::Delete, id).await?;
        let removed_reviews = self
            .reviews
            .delete_for_ad(id)
            .await
            .map_err(map_review_error)?;
        if !self.ads.delete(id).await.map_err(map_ad_error)? {
            return Err(Error::not_found(NOT_FOUND));
        }
        info!(ad = %id, removed_reviews, "ad deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "ads_service_tests.rs"]
mod tests;
