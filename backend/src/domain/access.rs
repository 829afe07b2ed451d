//! Access decisions for ads, reviews and user profiles.
//!
//! Every operation on a resource is governed by one [`Policy`] taken from a
//! fixed table ([`policy_for`]):
//!
//! | Resource     | list          | retrieve      | create        | update        | delete        |
//! |--------------|---------------|---------------|---------------|---------------|---------------|
//! | Ad           | Open          | Authenticated | Authenticated | OwnerOrAdmin  | OwnerOrAdmin  |
//! | Review       | Authenticated | OwnerOrAdmin  | Authenticated | OwnerOrAdmin  | OwnerOrAdmin  |
//! | User profile | Authenticated | SelfOnly      | Open          | SelfOnly      | SelfOnly      |
//!
//! Services evaluate in two steps. [`authorize_request`] runs before the
//! target is loaded, so anonymous callers get `unauthorized` even for ids
//! that do not exist. [`authorize_object`] runs once the target is in hand
//! and applies the ownership and role checks.

use tracing::info;

use super::{Ad, Error, Principal, Review, UserId, UserProfile};

/// Detail returned when an anonymous caller hits a protected operation.
pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
/// Detail returned when an owner-or-admin check fails.
pub const OWNER_OR_ADMIN_DENIED: &str =
    "Only the author or an administrator may operate on this object.";
/// Detail returned when a self-only check fails.
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Resource families with distinct policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Classified ads.
    Ad,
    /// Reviews on ads.
    Review,
    /// User profiles.
    UserProfile,
}

/// Operation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read a collection.
    List,
    /// Read one object.
    Retrieve,
    /// Create an object.
    Create,
    /// Modify an object.
    Update,
    /// Remove an object.
    Delete,
}

/// Allow/deny rule applied to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone, including anonymous callers.
    Open,
    /// Any authenticated principal.
    AuthenticatedOnly,
    /// The object's author or an administrator.
    OwnerOrAdmin,
    /// The profile owner only; administrators get no override.
    SelfOnly,
}

/// Look up the policy for an operation.
///
/// # Examples
/// ```
/// use classifieds::domain::access::{policy_for, Operation, Policy, ResourceKind};
///
/// assert_eq!(policy_for(ResourceKind::Ad, Operation::List), Policy::Open);
/// assert_eq!(policy_for(ResourceKind::Review, Operation::Retrieve), Policy::OwnerOrAdmin);
/// ```
pub const fn policy_for(resource: ResourceKind, operation: Operation) -> Policy {
    use Operation as Op;
    use ResourceKind as R;

    match (resource, operation) {
        (R::Ad, Op::List) | (R::UserProfile, Op::Create) => Policy::Open,
        (R::Ad, Op::Retrieve | Op::Create)
        | (R::Review, Op::List | Op::Create)
        | (R::UserProfile, Op::List) => Policy::AuthenticatedOnly,
        (R::Ad | R::Review, Op::Update | Op::Delete) | (R::Review, Op::Retrieve) => {
            Policy::OwnerOrAdmin
        }
        (R::UserProfile, Op::Retrieve | Op::Update | Op::Delete) => Policy::SelfOnly,
    }
}

/// Objects with a recorded author.
pub trait Authored {
    /// Recorded author, if any.
    fn author(&self) -> Option<UserId>;
}

impl Authored for Ad {
    fn author(&self) -> Option<UserId> {
        self.author
    }
}

impl Authored for Review {
    fn author(&self) -> Option<UserId> {
        self.author
    }
}

impl Authored for UserProfile {
    fn author(&self) -> Option<UserId> {
        Some(self.id)
    }
}

/// Whether `principal` is the recorded author of `target`.
///
/// Objects without an author are owned by nobody.
pub fn is_author(principal: &Principal, target: &impl Authored) -> bool {
    target.author() == Some(principal.id)
}

/// Whether `principal` belongs to the administrator group.
pub fn is_administrator(principal: &Principal) -> bool {
    principal.is_admin
}

/// Pre-load check: reject anonymous callers for non-open operations.
///
/// Returns the principal for operations that require one.
pub fn authorize_request(
    resource: ResourceKind,
    operation: Operation,
    principal: Option<&Principal>,
) -> Result<Option<&Principal>, Error> {
    match (policy_for(resource, operation), principal) {
        (Policy::Open, _) | (_, Some(_)) => Ok(principal),
        (_, None) => Err(Error::unauthorized(NOT_AUTHENTICATED)),
    }
}

/// Like [`authorize_request`] but for operations that always need a
/// principal; hands it back unwrapped.
pub fn require_principal(
    resource: ResourceKind,
    operation: Operation,
    principal: Option<&Principal>,
) -> Result<&Principal, Error> {
    authorize_request(resource, operation, principal)?
        .ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))
}

/// Object-level check, run after the target has been loaded.
pub fn authorize_object(
    resource: ResourceKind,
    operation: Operation,
    principal: Option<&Principal>,
    target: &impl Authored,
) -> Result<(), Error> {
    let policy = policy_for(resource, operation);
    if matches!(policy, Policy::Open | Policy::AuthenticatedOnly) {
        return Ok(());
    }
    let principal = principal.ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;

    let (allowed, detail) = match policy {
        Policy::OwnerOrAdmin => (
            is_author(principal, target) || is_administrator(principal),
            OWNER_OR_ADMIN_DENIED,
        ),
        Policy::SelfOnly => (is_author(principal, target), PERMISSION_DENIED),
        Policy::Open | Policy::AuthenticatedOnly => (true, ""),
    };

    if allowed {
        Ok(())
    } else {
        info!(
            principal = %principal.id,
            ?resource,
            ?operation,
            "access denied"
        );
        Err(Error::forbidden(detail))
    }
}

#[cfg(test)]
mod tests;
