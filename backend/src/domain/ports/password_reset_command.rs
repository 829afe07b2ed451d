//! Driving port for the two-step password reset.

use async_trait::async_trait;

use crate::domain::{Error, PasswordResetConfirmation, PasswordResetRequest, Principal};

/// Issue and redeem password-reset tokens for the authenticated caller.
#[async_trait]
pub trait PasswordResetCommand: Send + Sync {
    /// Issue a fresh token and mail the reset link.
    async fn request_reset(
        &self,
        principal: Option<&Principal>,
        request: PasswordResetRequest,
    ) -> Result<(), Error>;

    /// Redeem the outstanding token and replace the password.
    async fn confirm_reset(
        &self,
        principal: Option<&Principal>,
        confirmation: PasswordResetConfirmation,
    ) -> Result<(), Error>;
}
