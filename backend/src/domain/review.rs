//! Reviews left on ads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AdId, UserId};

/// Validation errors for review content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewValidationError {
    /// Text missing or blank.
    #[error("This field may not be blank.")]
    EmptyText,
    /// No ad reference supplied.
    #[error("This field is required.")]
    MissingAd,
}

impl ReviewValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyText => "text",
            Self::MissingAd => "ad",
        }
    }
}

/// Review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(i64);

impl ReviewId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-blank review body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewText(String);

impl ReviewText {
    /// Validate review text.
    pub fn new(raw: &str) -> Result<Self, ReviewValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ReviewText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Identifier.
    pub id: ReviewId,
    /// Body.
    pub text: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Reviewed ad.
    pub ad: AdId,
    /// Author; `None` once unowned.
    pub author: Option<UserId>,
}

/// Create payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Body.
    pub text: Option<String>,
    /// Target ad id.
    pub ad: Option<i64>,
}

impl ReviewDraft {
    /// Validate the text and pull out the ad reference.
    pub fn validate(self) -> Result<(ReviewText, AdId), ReviewValidationError> {
        let text = ReviewText::new(self.text.as_deref().unwrap_or_default())?;
        let ad = self.ad.map(AdId::new).ok_or(ReviewValidationError::MissingAd)?;
        Ok((text, ad))
    }
}

/// Partial update of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    /// Replacement text.
    pub text: Option<String>,
}
