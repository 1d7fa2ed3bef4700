//! Port for the tenant registry.
//!
//! Provisioning writes the tenant, its admin credential and its seed settings
//! as one unit: adapters must either persist all three or none.

use async_trait::async_trait;

use crate::domain::{
    AdminUser, AdminUsername, PasswordHash, SettingUpdate, Tenant, TenantName, TenantSlug,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tenant repository adapters.
    pub enum TenantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tenant repository connection failed: {message}"; internal,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "tenant repository query failed: {message}"; internal,
        /// Another tenant already owns the slug.
        SlugTaken { slug: String } =>
            "tenant slug '{slug}' already exists";
            conflict("Tenant already exists"),
        /// Another admin already owns the username.
        UsernameTaken { username: String } =>
            "admin username '{username}' already exists";
            conflict("Username already taken"),
    }
}

/// Everything needed to create a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantProvisioning {
    /// Routing slug.
    pub slug: TenantSlug,
    /// Display name.
    pub name: TenantName,
    /// Username of the first admin.
    pub admin_username: AdminUsername,
    /// Hash of the generated admin password.
    pub password_hash: PasswordHash,
    /// Settings written alongside the tenant.
    pub settings: Vec<SettingUpdate>,
}

/// Rows created by a successful provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTenant {
    /// New tenant.
    pub tenant: Tenant,
    /// Its admin credential.
    pub admin: AdminUser,
}

/// Port for tenant lookup and creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Fetch a tenant by slug.
    async fn find_by_slug(&self, slug: &TenantSlug)
    -> Result<Option<Tenant>, TenantRepositoryError>;

    /// Atomically create the tenant, its admin and its settings.
    ///
    /// Fails with [`TenantRepositoryError::SlugTaken`] or
    /// [`TenantRepositoryError::UsernameTaken`] without writing anything when
    /// a uniqueness rule would be broken.
    async fn provision(
        &self,
        request: &TenantProvisioning,
    ) -> Result<ProvisionedTenant, TenantRepositoryError>;
}
