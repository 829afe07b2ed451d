//! User account use-cases: registration, self-service profile management,
//! login and principal resolution.
//!
//! Field validation collects every failing field before returning so a
//! client sees all problems with a payload at once.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::access::{Operation, ResourceKind, authorize_object, authorize_request};
use crate::domain::ports::{
    LoginService, Registration, UserPersistenceError, UserRepository, UserUpdate, UsersCommand,
    UsersQuery,
};
use crate::domain::{
    Email, Error, LoginCredentials, NOT_FOUND, NewUser, Password, PasswordHash, Principal,
    UserAccount, UserChanges, UserId, UserProfile, UserRole, validate_name, validate_phone,
};

/// Group whose members are administrators unless configured otherwise.
pub const DEFAULT_ADMIN_GROUP: &str = "Administrators";
/// Detail returned for any failed login.
pub const LOGIN_FAILED: &str = "Unable to log in with provided credentials.";

const DUPLICATE_EMAIL: &str = "user with this email already exists.";
const REQUIRED: &str = "This field is required.";

/// User service implementing the user and login driving ports.
#[derive(Clone)]
pub struct UsersService<U> {
    users: Arc<U>,
    admin_group: String,
}

impl<U> UsersService<U> {
    /// Create a service whose administrators are members of `admin_group`.
    pub fn new(users: Arc<U>, admin_group: impl Into<String>) -> Self {
        Self {
            users,
            admin_group: admin_group.into(),
        }
    }
}

/// Field-level problems gathered while validating one payload.
#[derive(Default)]
struct Violations(Vec<(&'static str, String)>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    fn check<T, E: fmt::Display>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        result
            .map_err(|err| self.push(field, err.to_string()))
            .ok()
    }

    fn into_result(self) -> Result<(), Error> {
        let mut violations = self.0.into_iter();
        let Some((field, message)) = violations.next() else {
            return Ok(());
        };
        Err(violations.fold(Error::field_error(field, message), |err, (field, message)| {
            err.with_field_error(field, message)
        }))
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::field_error("email", DUPLICATE_EMAIL),
    }
}

fn hash_password(password: &Password) -> Result<PasswordHash, Error> {
    password
        .hash()
        .map_err(|err| Error::internal(err.to_string()))
}

impl<U: UserRepository> UsersService<U> {
    async fn load_profile_authorized(
        &self,
        principal: Option<&Principal>,
        operation: Operation,
        id: UserId,
    ) -> Result<UserAccount, Error> {
        authorize_request(ResourceKind::UserProfile, operation, principal)?;
        let account = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        authorize_object(
            ResourceKind::UserProfile,
            operation,
            principal,
            &account.profile,
        )?;
        Ok(account)
    }

    fn validate_registration(registration: &Registration) -> Result<NewUser, Error> {
        let mut violations = Violations::default();
        let email = match registration.email.as_deref().map(str::trim) {
            None | Some("") => {
                violations.push("email", REQUIRED);
                None
            }
            Some(raw) => violations.check("email", Email::new(raw)),
        };
        let password = match registration.password.as_deref() {
            None => {
                violations.push("password", REQUIRED);
                None
            }
            Some(raw) => violations.check("password", Password::new(raw)),
        };
        let first_name = violations.check(
            "first_name",
            validate_name("first_name", registration.first_name.as_deref().unwrap_or_default()),
        );
        let last_name = violations.check(
            "last_name",
            validate_name("last_name", registration.last_name.as_deref().unwrap_or_default()),
        );
        let phone = violations.check(
            "phone",
            validate_phone(registration.phone.as_deref().unwrap_or_default()),
        );
        violations.into_result()?;

        match (email, password, first_name, last_name, phone) {
            (Some(email), Some(password), Some(first_name), Some(last_name), Some(phone)) => {
                Ok(NewUser {
                    email,
                    password_hash: hash_password(&password)?,
                    first_name,
                    last_name,
                    phone,
                    role: UserRole::User,
                })
            }
            _ => Err(Error::internal("registration validation lost a field")),
        }
    }

    fn validate_update(update: UserUpdate) -> Result<UserChanges, Error> {
        let mut violations = Violations::default();
        let mut changes = UserChanges::default();
        if let Some(raw) = update.email {
            changes.email = violations.check("email", Email::new(raw));
        }
        if let Some(raw) = update.first_name {
            changes.first_name = violations.check("first_name", validate_name("first_name", &raw));
        }
        if let Some(raw) = update.last_name {
            changes.last_name = violations.check("last_name", validate_name("last_name", &raw));
        }
        if let Some(raw) = update.phone {
            changes.phone = violations.check("phone", validate_phone(&raw));
        }
        if let Some(raw) = update.image {
            let trimmed = raw.trim();
            changes.image = Some((!trimmed.is_empty()).then(|| trimmed.to_owned()));
        }
        let password = update
            .password
            .and_then(|raw| violations.check("password", Password::new(&raw)));
        violations.into_result()?;

        if let Some(password) = password {
            changes.password_hash = Some(hash_password(&password)?);
        }
        Ok(changes)
    }
}

#[async_trait]
impl<U: UserRepository> UsersQuery for UsersService<U> {
    async fn list_users(&self, principal: Option<&Principal>) -> Result<Vec<UserProfile>, Error> {
        authorize_request(ResourceKind::UserProfile, Operation::List, principal)?;
        self.users.list().await.map_err(map_user_error)
    }

    async fn get_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
    ) -> Result<UserProfile, Error> {
        self.load_profile_authorized(principal, Operation::Retrieve, id)
            .await
            .map(|account| account.profile)
    }

    async fn resolve_principal(&self, id: UserId) -> Result<Option<Principal>, Error> {
        let account = self.users.find_by_id(id).await.map_err(map_user_error)?;
        Ok(account
            .filter(|account| account.profile.is_active)
            .map(|account| account.principal(&self.admin_group)))
    }
}

#[async_trait]
impl<U: UserRepository> UsersCommand for UsersService<U> {
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let new_user = Self::validate_registration(&registration)?;
        let account = self
            .users
            .create(&new_user)
            .await
            .map_err(map_user_error)?;
        info!(user = %account.id(), "user registered");
        Ok(account.profile)
    }

    async fn update_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
        update: UserUpdate,
    ) -> Result<UserProfile, Error> {
        let current = self
            .load_profile_authorized(principal, Operation::Update, id)
            .await?;
        let changes = Self::validate_update(update)?;
        if changes.is_empty() {
            return Ok(current.profile);
        }
        let updated = self
            .users
            .update(id, &changes)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        if changes.password_hash.is_some() {
            info!(user = %id, "password changed through profile update");
        }
        Ok(updated.profile)
    }

    async fn delete_user(&self, principal: Option<&Principal>, id: UserId) -> Result<(), Error> {
        self.load_profile_authorized(principal, Operation::Delete, id)
            .await?;
        if !self.users.delete(id).await.map_err(map_user_error)? {
            return Err(Error::not_found(NOT_FOUND));
        }
        info!(user = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U: UserRepository> LoginService for UsersService<U> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Error::unauthorized(LOGIN_FAILED));
        };
        let account = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?;
        match account {
            Some(account)
                if account.profile.is_active
                    && account.password_hash.verify(credentials.password()) =>
            {
                info!(user = %account.id(), "login succeeded");
                Ok(account.profile)
            }
            Some(account) => {
                debug!(user = %account.id(), "login rejected");
                Err(Error::unauthorized(LOGIN_FAILED))
            }
            None => Err(Error::unauthorized(LOGIN_FAILED)),
        }
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
