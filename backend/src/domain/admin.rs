//! Admin credential model.
//!
//! Usernames form one global directory: a username identifies exactly one
//! admin across all tenants, and that admin belongs to exactly one tenant.

use std::fmt;

use chrono::{DateTime, Utc};

use super::contact::is_email_shaped;
use super::{PasswordHash, TenantId};

/// Database identifier of an admin credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdminId(i32);

impl AdminId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for admin usernames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminUsernameError {
    /// The username is not email-shaped.
    #[error("Please enter a valid email address")]
    NotEmailShaped,
}

/// Email-shaped admin username.
///
/// Matching is exact after trimming: usernames are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminUsername(String);

impl AdminUsername {
    /// Validate a username.
    ///
    /// # Errors
    /// [`AdminUsernameError::NotEmailShaped`] for anything that does not
    /// look like an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AdminUsernameError> {
        let trimmed = raw.as_ref().trim();
        if is_email_shaped(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(AdminUsernameError::NotEmailShaped)
        }
    }
}

impl AsRef<str> for AdminUsername {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role attached to an admin credential.
///
/// Only one role exists today; it is still persisted so the column can grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminRole {
    /// Full administrator of one tenant.
    #[default]
    Admin,
}

impl AdminRole {
    /// Stored and serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role, falling back to [`AdminRole::Admin`].
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            other => {
                tracing::warn!(role = other, "unrecognised admin role, treating as admin");
                Self::Admin
            }
        }
    }
}

/// Stored admin credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// Database identifier.
    pub id: AdminId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Login name.
    pub username: AdminUsername,
    /// Argon2id hash of the password.
    pub password_hash: PasswordHash,
    /// Role.
    pub role: AdminRole,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}
