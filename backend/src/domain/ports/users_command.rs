//! Driving port for account registration and self-service profile changes.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, Principal, UserId, UserProfile};

/// Raw sign-up payload; validated by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Desired login address.
    pub email: Option<String>,
    /// Chosen password.
    pub password: Option<Zeroizing<String>>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact number.
    pub phone: Option<String>,
}

/// Raw partial profile update. A blank `phone` or `image` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New login address.
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New contact number.
    pub phone: Option<String>,
    /// New avatar path.
    pub image: Option<String>,
    /// New password.
    pub password: Option<Zeroizing<String>>,
}

/// Write-side user use-cases.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an active account. Open to anonymous callers.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Update the caller's own profile.
    async fn update_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
        update: UserUpdate,
    ) -> Result<UserProfile, Error>;

    /// Delete the caller's own account.
    async fn delete_user(&self, principal: Option<&Principal>, id: UserId) -> Result<(), Error>;
}
