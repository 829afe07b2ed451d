//! PostgreSQL-backed `AdRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdPersistenceError, AdRepository};
use crate::domain::{Ad, AdContent, AdFilter, AdId, AdSlice, UserId};

use super::diesel_error_mapping::map_basic;
use super::models::{AdContentChangeset, AdRow, NewAdRow};
use super::pool::{DbPool, PoolError};
use super::schema::ads;

/// Diesel implementation of [`AdRepository`].
#[derive(Clone)]
pub struct DieselAdRepository {
    pool: DbPool,
}

impl DieselAdRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdPersistenceError {
    AdPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> AdPersistenceError {
    map_basic(
        error,
        operation,
        AdPersistenceError::query,
        AdPersistenceError::connection,
    )
}

fn into_ad(row: AdRow) -> Result<Ad, AdPersistenceError> {
    Ad::try_from(row).map_err(AdPersistenceError::query)
}

fn to_sql_bound(value: u64, name: &str) -> Result<i64, AdPersistenceError> {
    i64::try_from(value).map_err(|_| AdPersistenceError::query(format!("{name} {value} is too large")))
}

fn filtered(filter: &AdFilter) -> ads::BoxedQuery<'_, Pg> {
    let mut query = ads::table.into_boxed();
    if let Some(title) = &filter.title {
        query = query.filter(ads::title.eq(title));
    }
    query
}

#[async_trait]
impl AdRepository for DieselAdRepository {
    async fn create(
        &self,
        content: &AdContent,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Ad, AdPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAdRow {
            title: content.title(),
            price: i64::from(content.price()),
            description: content.description(),
            created_at,
            author_id: Some(author.get()),
        };
        let stored = diesel::insert_into(ads::table)
            .values(&row)
            .returning(AdRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "create ad"))?;
        into_ad(stored)
    }

    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        ads::table
            .find(id.get())
            .select(AdRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find ad"))?
            .map(into_ad)
            .transpose()
    }

    async fn list(
        &self,
        filter: &AdFilter,
        offset: u64,
        limit: u64,
    ) -> Result<AdSlice, AdPersistenceError> {
        let offset = to_sql_bound(offset, "offset")?;
        let limit = to_sql_bound(limit, "limit")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "count ads"))?;
        let rows: Vec<AdRow> = filtered(filter)
            .order((ads::created_at.desc(), ads::id.desc()))
            .offset(offset)
            .limit(limit)
            .select(AdRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list ads"))?;

        Ok(AdSlice {
            ads: rows.into_iter().map(into_ad).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(
        &self,
        id: AdId,
        content: &AdContent,
    ) -> Result<Option<Ad>, AdPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(ads::table.find(id.get()))
            .set(AdContentChangeset::from(content))
            .returning(AdRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "update ad"))?
            .map(into_ad)
            .transpose()
    }

    async fn delete(&self, id: AdId) -> Result<bool, AdPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(ads::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "delete ad"))?;
        Ok(removed > 0)
    }
}
