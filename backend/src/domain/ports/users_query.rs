//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to read profiles and to turn the user id
//! held in a session into a [`Principal`] without touching persistence.

use async_trait::async_trait;

use crate::domain::{Error, Principal, UserId, UserProfile};

/// Read-side user use-cases.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All profiles; requires an authenticated caller.
    async fn list_users(&self, principal: Option<&Principal>) -> Result<Vec<UserProfile>, Error>;

    /// The caller's own profile. Other ids are forbidden, admins included.
    async fn get_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
    ) -> Result<UserProfile, Error>;

    /// Load the principal for a session. Unknown and inactive users resolve
    /// to `None`.
    async fn resolve_principal(&self, id: UserId) -> Result<Option<Principal>, Error>;
}
