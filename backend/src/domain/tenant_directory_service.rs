//! Tenant registry service.
//!
//! Implements [`TenantDirectory`] over the tenant and admin repositories.
//! Generated passwords leave this module only inside [`IssuedCredentials`];
//! log lines carry the slug and username, never the secret.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::password::{random_suffix, run_blocking};
use crate::domain::ports::{
    AdminRepository, CredentialChange, IssuedCredentials, TenantDirectory, TenantProvisioning,
    TenantRepository, TenantRepositoryError,
};
use crate::domain::{
    AdminUsername, Error, PasswordHash, SettingUpdate, Tenant, TenantName, TenantSlug,
    generate_admin_password,
};

fn tenant_not_found() -> Error {
    Error::not_found("Tenant not found")
}

/// Tenant registry service implementing [`TenantDirectory`].
#[derive(Clone)]
pub struct TenantDirectoryService<T, A> {
    tenants: Arc<T>,
    admins: Arc<A>,
    auto_provision: bool,
}

impl<T, A> TenantDirectoryService<T, A> {
    /// Create a service. With `auto_provision` off, unknown slugs resolve to
    /// not found instead of being created.
    pub fn new(tenants: Arc<T>, admins: Arc<A>, auto_provision: bool) -> Self {
        Self {
            tenants,
            admins,
            auto_provision,
        }
    }
}

impl<T, A> TenantDirectoryService<T, A>
where
    T: TenantRepository,
    A: AdminRepository,
{
    async fn create(
        &self,
        slug: &TenantSlug,
        name: TenantName,
        username: String,
    ) -> Result<IssuedCredentials, TenantRepositoryError> {
        let username = AdminUsername::new(username).map_err(|err| {
            TenantRepositoryError::query(format!("derived admin username is invalid: {err}"))
        })?;
        let password = generate_admin_password(slug);
        let to_hash = password.clone();
        let password_hash = run_blocking(move || PasswordHash::generate(&to_hash))
            .await
            .map_err(|err| TenantRepositoryError::query(err.to_string()))?;

        let created = self
            .tenants
            .provision(&TenantProvisioning {
                slug: slug.clone(),
                name,
                admin_username: username,
                password_hash,
                settings: SettingUpdate::defaults(),
            })
            .await?;
        info!(
            slug = %created.tenant.slug,
            admin = %created.admin.username,
            "tenant provisioned"
        );
        Ok(IssuedCredentials {
            tenant: created.tenant,
            username: created.admin.username,
            password,
        })
    }

    /// Auto-provisioning path of [`TenantDirectory::resolve`].
    ///
    /// Public requests must not fail because an admin elsewhere renamed
    /// themselves to this slug's default username, so a taken default is
    /// retried once under a random fallback username.
    async fn provision_on_first_use(&self, slug: &TenantSlug) -> Result<Tenant, Error> {
        let name = TenantName::from_slug(slug);
        let outcome = match self
            .create(slug, name.clone(), slug.admin_username())
            .await
        {
            Err(TenantRepositoryError::UsernameTaken { username }) => {
                warn!(%slug, %username, "default admin username taken, using a fallback");
                self.create(slug, name, slug.fallback_admin_username(&random_suffix()))
                    .await
            }
            other => other,
        };
        match outcome {
            Ok(issued) => Ok(issued.tenant),
            // A concurrent request provisioned the slug first.
            Err(TenantRepositoryError::SlugTaken { .. }) => {
                self.lookup(slug).await?.ok_or_else(|| {
                    Error::internal(format!("tenant {slug} vanished after a slug conflict"))
                })
            }
            Err(TenantRepositoryError::UsernameTaken { username }) => Err(Error::internal(
                format!("fallback admin username {username} is taken"),
            )),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<T, A> TenantDirectory for TenantDirectoryService<T, A>
where
    T: TenantRepository,
    A: AdminRepository,
{
    async fn resolve(&self, slug: &TenantSlug) -> Result<Tenant, Error> {
        if let Some(tenant) = self.lookup(slug).await? {
            return Ok(tenant);
        }
        if !self.auto_provision {
            return Err(tenant_not_found());
        }
        self.provision_on_first_use(slug).await
    }

    async fn lookup(&self, slug: &TenantSlug) -> Result<Option<Tenant>, Error> {
        Ok(self.tenants.find_by_slug(slug).await?)
    }

    async fn provision(
        &self,
        slug: &TenantSlug,
        name: Option<TenantName>,
    ) -> Result<IssuedCredentials, Error> {
        let name = name.unwrap_or_else(|| TenantName::from_slug(slug));
        Ok(self.create(slug, name, slug.admin_username()).await?)
    }

    async fn rotate_admin_password(&self, slug: &TenantSlug) -> Result<IssuedCredentials, Error> {
        let tenant = self.lookup(slug).await?.ok_or_else(tenant_not_found)?;
        let admin = self
            .admins
            .find_by_tenant(tenant.id)
            .await?
            .ok_or_else(|| Error::not_found("Admin user not found"))?;

        let password: Zeroizing<String> = generate_admin_password(slug);
        let to_hash = password.clone();
        let password_hash = run_blocking(move || PasswordHash::generate(&to_hash))
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let updated = self
            .admins
            .update_credentials(
                admin.id,
                &CredentialChange {
                    username: None,
                    password_hash: Some(password_hash),
                },
            )
            .await?
            .ok_or_else(|| Error::not_found("Admin user not found"))?;
        info!(slug = %tenant.slug, admin = %updated.username, "admin password rotated");
        Ok(IssuedCredentials {
            tenant,
            username: updated.username,
            password,
        })
    }
}

#[cfg(test)]
#[path = "tenant_directory_service_tests.rs"]
mod tests;
