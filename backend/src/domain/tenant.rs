//! Tenant registry model.
//!
//! A tenant is one client brand's isolated site. Its slug is the only
//! external identifier: every route is keyed by it and every lead, setting
//! and admin credential hangs off the tenant's numeric id.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Longest accepted slug.
pub const SLUG_MAX: usize = 64;
/// Longest accepted display name.
pub const TENANT_NAME_MAX: usize = 120;

/// Path words under `/api` that would shadow fixed routes.
const RESERVED_SLUGS: [&str; 5] = ["admin", "auth", "email", "game", "health"];

/// Validation errors for tenant fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantValidationError {
    /// The slug is empty after trimming.
    #[error("tenant slug must not be empty")]
    EmptySlug,
    /// The slug is longer than [`SLUG_MAX`].
    #[error("tenant slug must be at most {SLUG_MAX} characters")]
    SlugTooLong,
    /// The slug contains characters outside `[a-z0-9-]` or starts/ends with a hyphen.
    #[error("tenant slug may only contain lowercase letters, digits and inner hyphens")]
    InvalidSlug,
    /// The slug collides with a fixed API route.
    #[error("tenant slug '{0}' is reserved")]
    ReservedSlug(String),
    /// The display name is empty after trimming.
    #[error("tenant name must not be empty")]
    EmptyName,
    /// The display name is longer than [`TENANT_NAME_MAX`].
    #[error("tenant name must be at most {TENANT_NAME_MAX} characters")]
    NameTooLong,
}

/// Database identifier of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(i32);

impl TenantId {
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

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// URL slug naming a tenant.
///
/// Input is trimmed and lowercased, so `"Acme"` and `"acme"` name the same
/// tenant.
///
/// # Examples
/// ```
/// use scratch_backend::domain::TenantSlug;
///
/// let slug = TenantSlug::new(" Acme-Plumbing ").unwrap();
/// assert_eq!(slug.as_ref(), "acme-plumbing");
/// assert!(TenantSlug::new("-acme").is_err());
/// assert!(TenantSlug::new("admin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantSlug(String);

impl TenantSlug {
    /// Validate and normalise a slug.
    ///
    /// # Errors
    /// Returns a [`TenantValidationError`] describing the first violated rule.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TenantValidationError> {
        let slug = raw.as_ref().trim().to_ascii_lowercase();
        if slug.is_empty() {
            return Err(TenantValidationError::EmptySlug);
        }
        if slug.len() > SLUG_MAX {
            return Err(TenantValidationError::SlugTooLong);
        }
        if !slug_regex().is_match(&slug) {
            return Err(TenantValidationError::InvalidSlug);
        }
        if RESERVED_SLUGS.contains(&slug.as_str()) {
            return Err(TenantValidationError::ReservedSlug(slug));
        }
        Ok(Self(slug))
    }

    /// Username of the admin credential generated for this tenant.
    #[must_use]
    pub fn admin_username(&self) -> String {
        format!("admin@{}.com", self.0)
    }

    /// Alternative admin username used when [`Self::admin_username`] already
    /// belongs to another tenant's admin.
    #[must_use]
    pub fn fallback_admin_username(&self, suffix: &str) -> String {
        format!("admin-{}@{}.com", suffix.to_ascii_lowercase(), self.0)
    }
}

impl AsRef<str> for TenantSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable tenant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantName(String);

impl TenantName {
    /// Validate a display name.
    ///
    /// # Errors
    /// Rejects blank names and names longer than [`TENANT_NAME_MAX`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TenantValidationError> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(TenantValidationError::EmptyName);
        }
        if name.chars().count() > TENANT_NAME_MAX {
            return Err(TenantValidationError::NameTooLong);
        }
        Ok(Self(name.to_owned()))
    }

    /// Default name for a tenant provisioned from its slug alone.
    #[must_use]
    pub fn from_slug(slug: &TenantSlug) -> Self {
        Self(slug.as_ref().to_owned())
    }
}

impl AsRef<str> for TenantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stored tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Database identifier.
    pub id: TenantId,
    /// Display name.
    pub name: TenantName,
    /// Routing slug.
    pub slug: TenantSlug,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("acme", "acme")]
    #[case("  CIFUENTES ", "cifuentes")]
    #[case("done-for-you-pros", "done-for-you-pros")]
    #[case("a", "a")]
    #[case("7up", "7up")]
    fn normalises_valid_slugs(#[case] raw: &str, #[case] expected: &str) {
        let slug = TenantSlug::new(raw).expect("valid slug");
        assert_eq!(slug.as_ref(), expected);
    }

    #[rstest]
    #[case("", TenantValidationError::EmptySlug)]
    #[case("   ", TenantValidationError::EmptySlug)]
    #[case("-acme", TenantValidationError::InvalidSlug)]
    #[case("acme-", TenantValidationError::InvalidSlug)]
    #[case("acme plumbing", TenantValidationError::InvalidSlug)]
    #[case("acme_plumbing", TenantValidationError::InvalidSlug)]
    #[case("auth", TenantValidationError::ReservedSlug("auth".to_owned()))]
    fn rejects_invalid_slugs(#[case] raw: &str, #[case] expected: TenantValidationError) {
        assert_eq!(TenantSlug::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_slug() {
        let raw = "a".repeat(SLUG_MAX + 1);
        assert_eq!(TenantSlug::new(raw), Err(TenantValidationError::SlugTooLong));
    }

    #[rstest]
    fn admin_username_embeds_slug() {
        let slug = TenantSlug::new("acme").expect("valid slug");
        assert_eq!(slug.admin_username(), "admin@acme.com");
        assert_eq!(slug.fallback_admin_username("X1y2Z3"), "admin-x1y2z3@acme.com");
    }

    #[rstest]
    fn name_defaults_to_slug_and_rejects_blank() {
        let slug = TenantSlug::new("acme").expect("valid slug");
        assert_eq!(TenantName::from_slug(&slug).as_ref(), "acme");
        assert_eq!(TenantName::new("  "), Err(TenantValidationError::EmptyName));
    }
}
