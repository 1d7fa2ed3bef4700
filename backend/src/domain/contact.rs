//! Contact details captured from registrants and admins.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::validation::FieldIssue;

/// Longest accepted email address (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;
/// Shortest accepted phone number once trimmed.
pub const PHONE_MIN: usize = 10;
/// Longest accepted phone number once trimmed.
pub const PHONE_MAX: usize = 32;

/// Validation errors for contact details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// The email is empty, malformed or too long.
    #[error("Please enter a valid email address")]
    InvalidEmail,
    /// The phone number is shorter than [`PHONE_MIN`].
    #[error("Please enter a valid phone number")]
    PhoneTooShort,
    /// The phone number is longer than [`PHONE_MAX`].
    #[error("Phone number must be at most {PHONE_MAX} characters")]
    PhoneTooLong,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld with no whitespace and a dotted domain.
        Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `value` looks like an email address.
#[must_use]
pub fn is_email_shaped(value: &str) -> bool {
    value.len() <= EMAIL_MAX && email_regex().is_match(value)
}

/// Normalised (trimmed, lowercased) email address.
///
/// # Examples
/// ```
/// use scratch_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Jo@Example.com ").unwrap();
/// assert_eq!(email.as_ref(), "jo@example.com");
/// assert!(EmailAddress::new("jo@localhost").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Errors
    /// [`ContactValidationError::InvalidEmail`] when the input is not
    /// email-shaped.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContactValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if is_email_shaped(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(ContactValidationError::InvalidEmail)
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed phone number as typed by the registrant.
///
/// Formatting is kept verbatim; only the length is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number.
    ///
    /// # Errors
    /// Returns a length error when the trimmed input is outside
    /// [`PHONE_MIN`]..=[`PHONE_MAX`] characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContactValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < PHONE_MIN {
            return Err(ContactValidationError::PhoneTooShort);
        }
        if length > PHONE_MAX {
            return Err(ContactValidationError::PhoneTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ContactValidationError {
    /// Convert into a field issue for `field`.
    #[must_use]
    pub fn into_issue(self, field: &'static str) -> FieldIssue {
        let code = match self {
            Self::InvalidEmail => "invalid_email",
            Self::PhoneTooShort => "too_short",
            Self::PhoneTooLong => "too_long",
        };
        FieldIssue::new(field, code, self.to_string())
    }
}
