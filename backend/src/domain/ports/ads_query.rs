//! Driving port for reading ads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Ad, AdFilter, AdId, AdSlice, Error, Principal};

/// Read-side ad use-cases.
#[async_trait]
pub trait AdsQuery: Send + Sync {
    /// One page of ads matching `filter`, newest first. Open to anyone.
    async fn list_ads(&self, filter: &AdFilter, page: PageRequest) -> Result<AdSlice, Error>;

    /// A single ad; requires an authenticated caller.
    async fn get_ad(&self, principal: Option<&Principal>, id: AdId) -> Result<Ad, Error>;
}
