//! Password-reset tokens and request payloads.
//!
//! A user holds at most one outstanding token. Issuing a new token replaces
//! the previous one; confirming leaves it in place:
//!
//! ```text
//! NoPendingToken --issue--> TokenIssued
//! TokenIssued    --issue--> TokenIssued   (last wins)
//! TokenIssued  --confirm--> TokenIssued   (password replaced)
//! ```

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// Random bytes behind each token (128 bits).
const TOKEN_BYTES: usize = 16;

/// Generic failure for any mismatch during confirmation.
pub const INVALID_RESET_LINK: &str = "Invalid password reset link";
/// Response message after a reset link is dispatched.
pub const RESET_EMAIL_SENT: &str = "Password reset email sent";
/// Response message after a successful confirmation.
pub const PASSWORD_CHANGED: &str = "Password changed";

/// Opaque reset token, 32 lowercase hex characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken(String);

impl ResetToken {
    /// Draw a new token from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Rehydrate a stored token.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare against a caller-supplied token in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken(..)")
    }
}

/// Body of a reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    /// Address the caller expects the link at.
    pub email: String,
}

/// Body of a reset confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetConfirmation {
    /// User id encoded in the reset link.
    pub uid: i64,
    /// Token encoded in the reset link.
    pub token: String,
    /// Replacement password.
    pub new_password: String,
}

/// Build the link mailed to the user: `{base}{uid}/{token}/`.
pub fn reset_link(base_url: &str, uid: i64, token: &ResetToken) -> String {
    let separator = if base_url.ends_with('/') { "" } else { "/" };
    format!("{base_url}{separator}{uid}/{}/", token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_tokens_are_lowercase_hex() {
        let token = ResetToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[rstest]
    fn generated_tokens_differ() {
        assert_ne!(ResetToken::generate(), ResetToken::generate());
    }

    #[rstest]
    #[case("0123456789abcdef0123456789abcdef", true)]
    #[case("0123456789abcdef0123456789abcdee", false)]
    #[case("0123456789abcdef", false)]
    #[case("0123456789abcdef0123456789abcdef00", false)]
    #[case("", false)]
    fn matches_requires_exact_token(#[case] candidate: &str, #[case] expected: bool) {
        let token = ResetToken::from_stored("0123456789abcdef0123456789abcdef");
        assert_eq!(token.matches(candidate), expected);
    }

    #[rstest]
    #[case("http://localhost:3000/password/reset/")]
    #[case("http://localhost:3000/password/reset")]
    fn link_appends_uid_and_token(#[case] base: &str) {
        let token = ResetToken::from_stored("ab".repeat(16));
        assert_eq!(
            reset_link(base, 42, &token),
            format!("http://localhost:3000/password/reset/42/{}/", "ab".repeat(16))
        );
    }
}
