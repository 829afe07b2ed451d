//! Password-reset use-cases.
//!
//! Issuing stores a fresh token on the caller's account and mails a link to
//! the registered address, whatever address the request names. Confirming
//! checks the uid and token together and answers every mismatch with the
//! same [`INVALID_RESET_LINK`] message. The token stays valid afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::access::NOT_AUTHENTICATED;
use crate::domain::ports::{
    PasswordResetCommand, PasswordResetMailer, ResetLinkMessage, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Email, Error, INVALID_RESET_LINK, Password, PasswordResetConfirmation, PasswordResetRequest,
    Principal, ResetToken, reset_link,
};

/// Password-reset service over the user repository and a mailer.
#[derive(Clone)]
pub struct PasswordResetService<U, M: ?Sized> {
    users: Arc<U>,
    mailer: Arc<M>,
    reset_base_url: String,
}

impl<U, M: ?Sized> PasswordResetService<U, M> {
    /// Create a service mailing links rooted at `reset_base_url`.
    pub fn new(users: Arc<U>, mailer: Arc<M>, reset_base_url: impl Into<String>) -> Self {
        Self {
            users,
            mailer,
            reset_base_url: reset_base_url.into(),
        }
    }
}

fn authenticated(principal: Option<&Principal>) -> Result<&Principal, Error> {
    principal.ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn invalid_link() -> Error {
    Error::invalid_request(INVALID_RESET_LINK)
}

#[async_trait]
impl<U, M> PasswordResetCommand for PasswordResetService<U, M>
where
    U: UserRepository,
    M: PasswordResetMailer + ?Sized,
{
    async fn request_reset(
        &self,
        principal: Option<&Principal>,
        request: PasswordResetRequest,
    ) -> Result<(), Error> {
        let principal = authenticated(principal)?;
        let email = Email::new(request.email)
            .map_err(|err| Error::field_error("email", err.to_string()))?;
        if email != principal.email {
            info!(
                user = %principal.id,
                "reset requested for a different address; mailing the registered one"
            );
        }

        let token = ResetToken::generate();
        if !self
            .users
            .store_reset_token(principal.id, &token)
            .await
            .map_err(map_user_error)?
        {
            return Err(Error::unauthorized(NOT_AUTHENTICATED));
        }

        let message = ResetLinkMessage {
            recipient: principal.email.clone(),
            link: reset_link(&self.reset_base_url, principal.id.get(), &token),
        };
        self.mailer
            .send_reset_link(&message)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;
        info!(user = %principal.id, "password reset link issued");
        Ok(())
    }

    async fn confirm_reset(
        &self,
        principal: Option<&Principal>,
        confirmation: PasswordResetConfirmation,
    ) -> Result<(), Error> {
        let principal = authenticated(principal)?;
        if confirmation.uid != principal.id.get() {
            return Err(invalid_link());
        }
        let account = self
            .users
            .find_by_id(principal.id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(invalid_link)?;
        let token_matches = account
            .reset_token
            .as_ref()
            .is_some_and(|stored| stored.matches(&confirmation.token));
        if !token_matches {
            return Err(invalid_link());
        }

        let password = Password::new(&confirmation.new_password)
            .map_err(|err| Error::field_error("new_password", err.to_string()))?;
        let hash = password
            .hash()
            .map_err(|err| Error::internal(err.to_string()))?;
        if !self
            .users
            .replace_password(principal.id, &hash)
            .await
            .map_err(map_user_error)?
        {
            return Err(invalid_link());
        }
        info!(user = %principal.id, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
