//! PostgreSQL-backed `UserRepository`.
//!
//! E-mail uniqueness is enforced by the `users_email_lower_key` index, so a
//! unique violation on insert or update is reported as a duplicate address.
//! Deleting a user relies on `ON DELETE CASCADE` to remove group
//! memberships, authored ads (with their reviews) and authored reviews.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordHash, ResetToken, UserAccount, UserChanges, UserId, UserProfile,
};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_groups, users};

diesel::define_sql_function! {
    /// SQL `LOWER`, used for case-insensitive address lookups.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(
    error: &diesel::result::Error,
    operation: &str,
    email: Option<&Email>,
) -> UserPersistenceError {
    match (classify(error, operation), email) {
        (DieselFailure::UniqueViolation, Some(email)) => {
            UserPersistenceError::duplicate_email(email.as_ref())
        }
        (DieselFailure::Connection(message), _) => UserPersistenceError::connection(message),
        (DieselFailure::Query(message), _) => UserPersistenceError::query(message),
        (DieselFailure::UniqueViolation, None) => {
            UserPersistenceError::query("unique constraint violated")
        }
        (DieselFailure::ForeignKeyViolation, _) => {
            UserPersistenceError::query("foreign key constraint violated")
        }
    }
}

async fn load_groups(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Vec<String>, UserPersistenceError> {
    user_groups::table
        .filter(user_groups::user_id.eq(id))
        .order(user_groups::group_name.asc())
        .select(user_groups::group_name)
        .load(conn)
        .await
        .map_err(|err| map_diesel_error(&err, "load user groups", None))
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    row: Option<UserRow>,
) -> Result<Option<UserAccount>, UserPersistenceError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let groups = load_groups(conn, row.id).await?;
    row.into_account(groups)
        .map(Some)
        .map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserAccount, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            first_name: &user.first_name,
            last_name: &user.last_name,
            phone: user.phone.as_deref(),
            role: user.role.as_str(),
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "create user", Some(&user.email)))?;
        stored
            .into_account(Vec::new())
            .map_err(UserPersistenceError::query)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find user by id", None))?;
        hydrate(&mut conn, row).await
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(lower(users::email).eq(email.normalized()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find user by email", None))?;
        hydrate(&mut conn, row).await
    }

    async fn list(&self) -> Result<Vec<UserProfile>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list users", None))?;
        rows.into_iter()
            .map(|row| {
                row.into_account(Vec::new())
                    .map(|account| account.profile)
                    .map_err(UserPersistenceError::query)
            })
            .collect()
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(id.get()))
            .set(UserChangeset::from(changes))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "update user", changes.email.as_ref()))?;
        hydrate(&mut conn, row).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "delete user", None))?;
        Ok(removed > 0)
    }

    async fn store_reset_token(
        &self,
        id: UserId,
        token: &ResetToken,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::reset_token.eq(token.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "store reset token", None))?;
        Ok(updated > 0)
    }

    async fn replace_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::password_hash.eq(hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "replace password", None))?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("users_email_lower_key".to_owned()),
        )
    }

    #[rstest]
    fn unique_violations_name_the_duplicate_address() {
        let email = Email::new("ada@example.com").expect("valid email");
        assert_eq!(
            map_diesel_error(&unique_violation(), "create user", Some(&email)),
            UserPersistenceError::duplicate_email("ada@example.com")
        );
    }

    #[rstest]
    fn unique_violations_without_an_address_are_query_errors() {
        assert!(matches!(
            map_diesel_error(&unique_violation(), "add user to group", None),
            UserPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            UserPersistenceError::connection("timed out")
        );
    }
}
