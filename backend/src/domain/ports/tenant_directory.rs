//! Driving port for tenant resolution and operator provisioning.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{AdminUsername, Error, Tenant, TenantName, TenantSlug};

/// Plaintext admin credentials, handed out exactly once.
///
/// `Debug` hides the password.
#[derive(Clone)]
pub struct IssuedCredentials {
    /// Tenant the credentials belong to.
    pub tenant: Tenant,
    /// Admin login name.
    pub username: AdminUsername,
    /// Admin password; wiped on drop.
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for IssuedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedCredentials")
            .field("tenant", &self.tenant)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Domain use-case port for the tenant registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Return the tenant for `slug`, provisioning it when the auto-provision
    /// policy allows. Concurrent first calls yield one tenant.
    async fn resolve(&self, slug: &TenantSlug) -> Result<Tenant, Error>;

    /// Return the tenant for `slug` without ever creating one.
    async fn lookup(&self, slug: &TenantSlug) -> Result<Option<Tenant>, Error>;

    /// Create a tenant with seeded settings and a fresh admin credential.
    /// Conflict when the slug exists.
    async fn provision(
        &self,
        slug: &TenantSlug,
        name: Option<TenantName>,
    ) -> Result<IssuedCredentials, Error>;

    /// Replace the tenant admin's password with a freshly generated one.
    async fn rotate_admin_password(&self, slug: &TenantSlug) -> Result<IssuedCredentials, Error>;
}
