//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types, reporting corrupt rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Ad, AdContent, AdId, Email, PasswordHash, ResetToken, Review, ReviewId, UserAccount,
    UserChanges, UserId, UserProfile, UserRole,
};

use super::schema::{ads, reviews, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub reset_token: Option<String>,
}

impl UserRow {
    /// Attach group memberships and validate the stored address.
    pub(crate) fn into_account(self, groups: Vec<String>) -> Result<UserAccount, String> {
        let email = Email::new(self.email)
            .map_err(|err| format!("stored email for user {} is invalid: {err}", self.id))?;
        Ok(UserAccount {
            profile: UserProfile {
                id: UserId::new(self.id),
                email,
                first_name: self.first_name,
                last_name: self.last_name,
                phone: self.phone,
                role: UserRole::from_stored(&self.role),
                image: self.image,
                is_active: self.is_active,
            },
            password_hash: PasswordHash::from_phc(self.password_hash),
            reset_token: self.reset_token.map(ResetToken::from_stored),
            groups,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
}

/// Partial update; `None` leaves a column alone, `Some(None)` clears it.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub image: Option<Option<&'a str>>,
    pub password_hash: Option<&'a str>,
}

impl<'a> From<&'a UserChanges> for UserChangeset<'a> {
    fn from(changes: &'a UserChanges) -> Self {
        Self {
            email: changes.email.as_ref().map(AsRef::as_ref),
            first_name: changes.first_name.as_deref(),
            last_name: changes.last_name.as_deref(),
            phone: changes.phone.as_ref().map(Option::as_deref),
            image: changes.image.as_ref().map(Option::as_deref),
            password_hash: changes.password_hash.as_ref().map(PasswordHash::as_str),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdRow {
    pub id: i64,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<i64>,
}

impl TryFrom<AdRow> for Ad {
    type Error = String;

    fn try_from(row: AdRow) -> Result<Self, Self::Error> {
        let price = u32::try_from(row.price)
            .map_err(|_| format!("stored price {} for ad {} is out of range", row.price, row.id))?;
        Ok(Self {
            id: AdId::new(row.id),
            title: row.title,
            price,
            description: row.description,
            created_at: row.created_at,
            author: row.author_id.map(UserId::new),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = ads)]
pub(crate) struct NewAdRow<'a> {
    pub title: &'a str,
    pub price: i64,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<i64>,
}

/// Full overwrite of the editable columns; a `None` description stores NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = ads, treat_none_as_null = true)]
pub(crate) struct AdContentChangeset<'a> {
    pub title: &'a str,
    pub price: i64,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a AdContent> for AdContentChangeset<'a> {
    fn from(content: &'a AdContent) -> Self {
        Self {
            title: content.title(),
            price: i64::from(content.price()),
            description: content.description(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub ad_id: i64,
    pub author_id: Option<i64>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            text: row.text,
            created_at: row.created_at,
            ad: AdId::new(row.ad_id),
            author: row.author_id.map(UserId::new),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
    pub ad_id: i64,
    pub author_id: Option<i64>,
}
