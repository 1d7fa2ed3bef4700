//! Port for admin credential storage.
//!
//! Usernames are unique across every tenant, so lookups by username need no
//! tenant scope.

use async_trait::async_trait;

use crate::domain::{AdminId, AdminUser, AdminUsername, PasswordHash, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "admin repository connection failed: {message}"; internal,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "admin repository query failed: {message}"; internal,
        /// Another admin already owns the username.
        UsernameTaken { username: String } =>
            "admin username '{username}' already exists";
            conflict("Username already taken"),
    }
}

/// Fields to overwrite on an admin row; `None` leaves the column untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialChange {
    /// Replacement username.
    pub username: Option<AdminUsername>,
    /// Replacement password hash.
    pub password_hash: Option<PasswordHash>,
}

/// Port for admin credential lookup and mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Fetch an admin by exact username.
    async fn find_by_username(
        &self,
        username: &AdminUsername,
    ) -> Result<Option<AdminUser>, AdminRepositoryError>;

    /// Fetch an admin by id.
    async fn find_by_id(&self, id: AdminId) -> Result<Option<AdminUser>, AdminRepositoryError>;

    /// Fetch the admin of a tenant. Tenants have at most one admin; if there
    /// are several the oldest wins.
    async fn find_by_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<AdminUser>, AdminRepositoryError>;

    /// Apply `change` and return the updated row, or `None` when the admin
    /// no longer exists.
    async fn update_credentials(
        &self,
        id: AdminId,
        change: &CredentialChange,
    ) -> Result<Option<AdminUser>, AdminRepositoryError>;
}
