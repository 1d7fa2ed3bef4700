//! Driving port for admin authentication.
//!
//! Inbound adapters call this to check credentials and manage the signed-in
//! admin without knowing how credentials are stored or hashed.

use async_trait::async_trait;

use crate::domain::{AdminId, AdminUser, CredentialUpdate, Error, LoginCredentials};

/// Domain use-case port for admin sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminAuth: Send + Sync {
    /// Verify credentials. Unknown usernames and wrong passwords fail with
    /// the same unauthorized error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminUser, Error>;

    /// Admin behind a session, or `None` if it has been removed.
    async fn current(&self, id: AdminId) -> Result<Option<AdminUser>, Error>;

    /// Change the admin's own username and/or password.
    async fn update_credentials(
        &self,
        id: AdminId,
        update: CredentialUpdate,
    ) -> Result<AdminUser, Error>;
}
