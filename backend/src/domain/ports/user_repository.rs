//! Port abstraction for user account persistence and its errors.

use async_trait::async_trait;

use crate::domain::{
    Email, NewUser, PasswordHash, ResetToken, UserAccount, UserChanges, UserId, UserProfile,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the address (compared case-insensitively).
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts, their credentials and group membership.
///
/// Methods taking an id report a missing row as `None` / `false` rather than
/// an error so services decide how absence is surfaced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with no group memberships.
    async fn create(&self, user: &NewUser) -> Result<UserAccount, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by address, ignoring case.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// All profiles ordered by id.
    async fn list(&self) -> Result<Vec<UserProfile>, UserPersistenceError>;

    /// Apply `changes` and return the updated account.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Remove the account together with everything it authored.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Record `token` as the outstanding reset token, replacing any earlier one.
    async fn store_reset_token(
        &self,
        id: UserId,
        token: &ResetToken,
    ) -> Result<bool, UserPersistenceError>;

    /// Replace the password hash; the outstanding reset token is kept.
    async fn replace_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError>;
}
