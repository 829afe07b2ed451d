//! Domain primitives, access policy and use-case services.
//!
//! Purpose: define strongly typed entities for users, ads and reviews, the
//! policy deciding who may touch them, and the services that drive the
//! ports in [`ports`]. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`access`]: the policy table and its decision functions.
//! - Entities: [`UserProfile`], [`Ad`], [`Review`] and their validated inputs.
//! - Services: [`AdsService`], [`ReviewsService`], [`UsersService`],
//!   [`PasswordResetService`].

pub mod access;
pub mod ad;
mod ads_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod password_reset;
mod password_reset_service;
pub mod ports;
pub mod review;
mod reviews_service;
#[cfg(test)]
mod test_support;
mod trace_id;
pub mod user;
mod users_service;

pub use self::ad::{
    Ad, AdContent, AdDraft, AdFilter, AdId, AdPatch, AdSlice, AdValidationError, PRICE_MAX,
    TITLE_MAX,
};
pub use self::ads_service::AdsService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, FieldErrors, NOT_FOUND, TRACE_ID_HEADER};
pub use self::password::{
    PASSWORD_MIN, Password, PasswordHash, PasswordHashError, PasswordValidationError,
};
pub use self::password_reset::{
    INVALID_RESET_LINK, PASSWORD_CHANGED, PasswordResetConfirmation, PasswordResetRequest,
    RESET_EMAIL_SENT, ResetToken, reset_link,
};
pub use self::password_reset_service::PasswordResetService;
pub use self::review::{
    Review, ReviewDraft, ReviewId, ReviewPatch, ReviewText, ReviewValidationError,
};
pub use self::reviews_service::ReviewsService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, Principal, UserAccount, UserChanges, UserId, UserProfile, UserRole,
    UserValidationError, validate_name, validate_phone,
};
pub use self::users_service::{DEFAULT_ADMIN_GROUP, LOGIN_FAILED, UsersService};

