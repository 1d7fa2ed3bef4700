//! Admin authentication inputs.
//!
//! Handlers convert raw payload strings into these types before touching a
//! port, so services only ever see well-formed usernames and non-empty
//! passwords.

use zeroize::Zeroizing;

use super::validation::{FieldIssue, FieldIssues};
use super::{AdminUsername, AdminUsernameError};

/// Shortest password accepted when an admin changes their credentials.
pub const PASSWORD_MIN: usize = 6;

fn username_issue(err: AdminUsernameError) -> FieldIssue {
    FieldIssue::new("username", "invalid_email", err.to_string())
}

/// Validated login attempt.
///
/// The password keeps caller-provided whitespace and is wiped on drop.
///
/// # Examples
/// ```
/// use scratch_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin@acme.com", "acme-Ab12Cd").unwrap();
/// assert_eq!(creds.username().as_ref(), "admin@acme.com");
/// assert!(LoginCredentials::try_from_parts("admin", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: AdminUsername,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login inputs, reporting every invalid field.
    ///
    /// # Errors
    /// Returns the collected field issues when the username is not
    /// email-shaped or the password is empty.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, FieldIssues> {
        let mut issues = FieldIssues::new();
        let username = issues.collect(AdminUsername::new(username).map_err(username_issue));
        if password.is_empty() {
            issues.push(FieldIssue::new(
                "password",
                "empty_password",
                "Password is required",
            ));
        }
        issues.finish(|| {
            username.map(|username| Self {
                username,
                password: Zeroizing::new(password.to_owned()),
            })
        })
    }

    /// Username to look up.
    #[must_use]
    pub fn username(&self) -> &AdminUsername {
        &self.username
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated change to an admin's own credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialUpdate {
    username: Option<AdminUsername>,
    password: Option<Zeroizing<String>>,
}

impl CredentialUpdate {
    /// Validate an update where each field is optional but at least one is
    /// present.
    ///
    /// # Errors
    /// Returns field issues for a malformed username, a password shorter
    /// than [`PASSWORD_MIN`], or an update that changes nothing.
    pub fn try_from_parts(
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, FieldIssues> {
        let mut issues = FieldIssues::new();
        let username = username
            .and_then(|raw| issues.collect(AdminUsername::new(raw).map_err(username_issue)));
        let password = match password {
            Some(raw) if raw.chars().count() < PASSWORD_MIN => {
                issues.push(FieldIssue::new(
                    "password",
                    "too_short",
                    format!("Password must be at least {PASSWORD_MIN} characters"),
                ));
                None
            }
            Some(raw) => Some(Zeroizing::new(raw.to_owned())),
            None => None,
        };
        if issues.is_empty() && username.is_none() && password.is_none() {
            issues.push(FieldIssue::new(
                "username",
                "nothing_to_update",
                "Provide a new username or password",
            ));
        }
        issues.finish(|| Some(Self { username, password }))
    }

    /// New username, if one was requested.
    #[must_use]
    pub fn username(&self) -> Option<&AdminUsername> {
        self.username.as_ref()
    }

    /// New password, if one was requested.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|password| password.as_str())
    }
}
