//! Driving port for ad mutations.

use async_trait::async_trait;

use crate::domain::{Ad, AdDraft, AdId, AdPatch, Error, Principal};

/// Write-side ad use-cases.
///
/// The acting principal always becomes the author of a created ad; callers
/// cannot choose it.
#[async_trait]
pub trait AdsCommand: Send + Sync {
    /// Publish a new ad.
    async fn create_ad(&self, principal: Option<&Principal>, draft: AdDraft)
    -> Result<Ad, Error>;

    /// Partially update an ad owned by the caller (or any ad, for admins).
    async fn update_ad(
        &self,
        principal: Option<&Principal>,
        id: AdId,
        patch: AdPatch,
    ) -> Result<Ad, Error>;

    /// Delete an ad and every review attached to it.
    async fn delete_ad(&self, principal: Option<&Principal>, id: AdId) -> Result<(), Error>;
}
