//! User accounts, profiles and the authenticated principal.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::password::PasswordHash;
use super::password_reset::ResetToken;

/// Maximum length of the optional phone number.
pub const PHONE_MAX: usize = 20;
/// Maximum length of first and last names.
pub const NAME_MAX: usize = 150;
/// Maximum length of an e-mail address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors for user-supplied profile data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// E-mail address is missing or malformed.
    #[error("Enter a valid email address.")]
    InvalidEmail,
    /// A name exceeds [`NAME_MAX`] characters.
    #[error("Ensure this field has no more than {max} characters.")]
    NameTooLong {
        /// Offending field.
        field: &'static str,
        /// Permitted length.
        max: usize,
    },
    /// Phone number exceeds [`PHONE_MAX`] characters.
    #[error("Ensure this field has no more than {max} characters.")]
    PhoneTooLong {
        /// Permitted length.
        max: usize,
    },
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::NameTooLong { field, .. } => field,
            Self::PhoneTooLong { .. } => "phone",
        }
    }
}

/// Stable numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated e-mail address.
///
/// Addresses keep the caller's spelling but compare case-insensitively.
///
/// # Examples
/// ```
/// use classifieds::domain::Email;
///
/// let email = Email::new("  Ada@Example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "Ada@Example.com");
/// assert!(email.matches("ada@example.com"));
/// ```
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an address.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() > EMAIL_MAX || !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Case-insensitive comparison with a raw address.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }

    /// Lower-cased form used for uniqueness checks.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Descriptive role stored on the profile.
///
/// Administrator access comes from group membership, not from this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular member.
    #[default]
    User,
    /// Site administrator.
    Admin,
}

impl UserRole {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse the storage representation, defaulting unknown values to `User`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identifier.
    pub id: UserId,
    /// Unique e-mail address, also the login name.
    pub email: Email,
    /// Given name, possibly empty.
    pub first_name: String,
    /// Family name, possibly empty.
    pub last_name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Descriptive role.
    pub role: UserRole,
    /// Avatar path.
    pub image: Option<String>,
    /// Inactive users cannot log in.
    pub is_active: bool,
}

/// Stored account: the profile plus credentials and group membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Public profile.
    pub profile: UserProfile,
    /// Argon2 hash of the password.
    pub password_hash: PasswordHash,
    /// Outstanding password-reset token.
    pub reset_token: Option<ResetToken>,
    /// Names of the groups the user belongs to.
    pub groups: Vec<String>,
}

impl UserAccount {
    /// Identifier shortcut.
    pub fn id(&self) -> UserId {
        self.profile.id
    }

    /// Whether the account belongs to `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|name| name == group)
    }

    /// Principal view of this account.
    pub fn principal(&self, admin_group: &str) -> Principal {
        Principal {
            id: self.profile.id,
            email: self.profile.email.clone(),
            is_admin: self.in_group(admin_group),
        }
    }
}

/// The authenticated identity acting on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Identifier of the acting user.
    pub id: UserId,
    /// Registered address.
    pub email: Email,
    /// Membership of the administrator group.
    pub is_admin: bool,
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Address, checked for uniqueness by the repository.
    pub email: Email,
    /// Argon2 hash of the chosen password.
    pub password_hash: PasswordHash,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    pub phone: Option<String>,
    /// Descriptive role.
    pub role: UserRole,
}

/// Partial profile update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// New address.
    pub email: Option<Email>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// `Some(None)` clears the phone number.
    pub phone: Option<Option<String>>,
    /// `Some(None)` clears the avatar.
    pub image: Option<Option<String>>,
    /// Replacement password hash.
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.image.is_none()
            && self.password_hash.is_none()
    }
}

/// Check a first or last name.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::NameTooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Check a phone number; blank input means "no phone".
pub fn validate_phone(value: &str) -> Result<Option<String>, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > PHONE_MAX {
        return Err(UserValidationError::PhoneTooLong { max: PHONE_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}
