//! Classified ads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Longest accepted ad title, in characters.
pub const TITLE_MAX: usize = 300;
/// Largest price that fits the storage column.
pub const PRICE_MAX: u32 = i32::MAX.unsigned_abs();

/// Validation errors for ad content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdValidationError {
    /// Title missing or blank.
    #[error("This field may not be blank.")]
    EmptyTitle,
    /// Title longer than [`TITLE_MAX`].
    #[error("Ensure this field has no more than {max} characters.")]
    TitleTooLong {
        /// Permitted length.
        max: usize,
    },
    /// Price missing.
    #[error("This field is required.")]
    MissingPrice,
    /// Price below zero.
    #[error("Ensure this value is greater than or equal to 0.")]
    NegativePrice,
    /// Price above [`PRICE_MAX`].
    #[error("Ensure this value is less than or equal to {max}.")]
    PriceTooLarge {
        /// Permitted maximum.
        max: u32,
    },
}

impl AdValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::MissingPrice | Self::NegativePrice | Self::PriceTooLarge { .. } => "price",
        }
    }
}

/// Ad identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdId(i64);

impl AdId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ad {
    /// Identifier.
    pub id: AdId,
    /// Headline.
    pub title: String,
    /// Asking price in whole currency units.
    pub price: u32,
    /// Free-form body.
    pub description: Option<String>,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Author; `None` once unowned.
    pub author: Option<UserId>,
}

/// Validated editable fields of an ad.
///
/// ## Invariants
/// - `title` is trimmed, non-empty and at most [`TITLE_MAX`] characters.
/// - `price <= PRICE_MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdContent {
    title: String,
    price: u32,
    description: Option<String>,
}

impl AdContent {
    /// Validate raw values.
    ///
    /// # Examples
    /// ```
    /// use classifieds::domain::{AdContent, AdValidationError};
    ///
    /// let content = AdContent::new(" phone ", 10_000, None).expect("valid ad");
    /// assert_eq!(content.title(), "phone");
    /// assert_eq!(
    ///     AdContent::new("phone", -1, None),
    ///     Err(AdValidationError::NegativePrice)
    /// );
    /// ```
    pub fn new(
        title: &str,
        price: i64,
        description: Option<String>,
    ) -> Result<Self, AdValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AdValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(AdValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let price = u32::try_from(price).map_err(|_| {
            if price < 0 {
                AdValidationError::NegativePrice
            } else {
                AdValidationError::PriceTooLarge { max: PRICE_MAX }
            }
        })?;
        if price > PRICE_MAX {
            return Err(AdValidationError::PriceTooLarge { max: PRICE_MAX });
        }
        Ok(Self {
            title: title.to_owned(),
            price,
            description: description.filter(|text| !text.trim().is_empty()),
        })
    }

    /// Headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Asking price.
    pub fn price(&self) -> u32 {
        self.price
    }

    /// Body text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Create payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdDraft {
    /// Headline.
    pub title: Option<String>,
    /// Asking price.
    pub price: Option<i64>,
    /// Body text.
    pub description: Option<String>,
}

impl AdDraft {
    /// Validate into storable content.
    pub fn validate(self) -> Result<AdContent, AdValidationError> {
        let price = self.price.ok_or(AdValidationError::MissingPrice)?;
        AdContent::new(self.title.as_deref().unwrap_or_default(), price, self.description)
    }
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdPatch {
    /// New headline.
    pub title: Option<String>,
    /// New price.
    pub price: Option<i64>,
    /// New body text.
    pub description: Option<String>,
}

impl AdPatch {
    /// Merge onto `current` and validate the result.
    pub fn apply_to(self, current: &Ad) -> Result<AdContent, AdValidationError> {
        let title = self.title.unwrap_or_else(|| current.title.clone());
        let price = self.price.unwrap_or_else(|| i64::from(current.price));
        let description = match self.description {
            Some(text) => Some(text),
            None => current.description.clone(),
        };
        AdContent::new(&title, price, description)
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdFilter {
    /// Exact title match.
    pub title: Option<String>,
}

/// One slice of the ad listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSlice {
    /// Ads on the page, newest first.
    pub ads: Vec<Ad>,
    /// Number of ads matching the filter.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stored_ad() -> Ad {
        Ad {
            id: AdId::new(1),
            title: "phone".to_owned(),
            price: 10_000,
            description: Some("barely used".to_owned()),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            author: Some(UserId::new(1)),
        }
    }

    #[rstest]
    #[case("", 1, AdValidationError::EmptyTitle)]
    #[case("   ", 1, AdValidationError::EmptyTitle)]
    #[case("bike", -5, AdValidationError::NegativePrice)]
    #[case("bike", i64::from(PRICE_MAX) + 1, AdValidationError::PriceTooLarge { max: PRICE_MAX })]
    fn invalid_content_is_rejected(
        #[case] title: &str,
        #[case] price: i64,
        #[case] expected: AdValidationError,
    ) {
        assert_eq!(AdContent::new(title, price, None), Err(expected));
    }

    #[rstest]
    fn title_limit_counts_characters() {
        let at_limit = "é".repeat(TITLE_MAX);
        assert!(AdContent::new(&at_limit, 0, None).is_ok());
        let over = "é".repeat(TITLE_MAX + 1);
        assert_eq!(
            AdContent::new(&over, 0, None),
            Err(AdValidationError::TitleTooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn draft_without_price_names_the_field() {
        let err = AdDraft {
            title: Some("lamp".to_owned()),
            ..AdDraft::default()
        }
        .validate()
        .expect_err("price required");
        assert_eq!(err.field(), "price");
    }

    #[rstest]
    fn patch_keeps_untouched_fields() {
        let content = AdPatch {
            price: Some(20_000),
            ..AdPatch::default()
        }
        .apply_to(&stored_ad())
        .expect("valid patch");
        assert_eq!(content.title(), "phone");
        assert_eq!(content.price(), 20_000);
        assert_eq!(content.description(), Some("barely used"));
    }

    #[rstest]
    fn blank_description_is_cleared() {
        let content = AdPatch {
            description: Some("  ".to_owned()),
            ..AdPatch::default()
        }
        .apply_to(&stored_ad())
        .expect("valid patch");
        assert_eq!(content.description(), None);
    }
}
