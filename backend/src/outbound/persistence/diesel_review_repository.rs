//! PostgreSQL-backed `ReviewRepository`.
//!
//! The `reviews.ad_id` foreign key turns an insert against a vanished ad into
//! [`ReviewPersistenceError::MissingAd`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{AdId, Review, ReviewId, ReviewText, UserId};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel implementation of [`ReviewRepository`].
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    ReviewPersistenceError::connection(error.into_message())
}

fn map_diesel_error(
    error: &diesel::result::Error,
    operation: &str,
    ad: Option<AdId>,
) -> ReviewPersistenceError {
    match (classify(error, operation), ad) {
        (DieselFailure::ForeignKeyViolation, Some(ad)) => {
            ReviewPersistenceError::missing_ad(ad.get())
        }
        (DieselFailure::Connection(message), _) => ReviewPersistenceError::connection(message),
        (DieselFailure::Query(message), _) => ReviewPersistenceError::query(message),
        (DieselFailure::ForeignKeyViolation, None) => {
            ReviewPersistenceError::query("foreign key constraint violated")
        }
        (DieselFailure::UniqueViolation, _) => {
            ReviewPersistenceError::query("unique constraint violated")
        }
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn create(
        &self,
        text: &ReviewText,
        ad: AdId,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Review, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewRow {
            text: text.as_ref(),
            created_at,
            ad_id: ad.get(),
            author_id: Some(author.get()),
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Review::from)
            .map_err(|err| map_diesel_error(&err, "create review", Some(ad)))
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = reviews::table
            .find(id.get())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find review", None))?;
        Ok(row.map(Review::from))
    }

    async fn list(&self) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .order(reviews::id.asc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list reviews", None))?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn update_text(
        &self,
        id: ReviewId,
        text: &ReviewText,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(reviews::table.find(id.get()))
            .set(reviews::text.eq(text.as_ref()))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "update review", None))?;
        Ok(row.map(Review::from))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(reviews::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "delete review", None))?;
        Ok(removed > 0)
    }

    async fn delete_for_ad(&self, ad: AdId) -> Result<u64, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(reviews::table.filter(reviews::ad_id.eq(ad.get())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "delete reviews of ad", None))?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
