//! PostgreSQL-backed `TenantRepository`.
//!
//! Provisioning inserts the tenant, its admin and its seed settings in one
//! transaction; a unique violation on either the slug or the username rolls
//! all three back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    ProvisionedTenant, TenantProvisioning, TenantRepository, TenantRepositoryError,
};
use crate::domain::{AdminRole, AdminUser, Tenant, TenantSlug};

use super::diesel_error_mapping::{
    ADMIN_USERNAME_CONSTRAINT, DieselFailure, TENANT_SLUG_CONSTRAINT, classify_diesel_error,
    pool_error_message,
};
use super::models::{AdminUserRow, NewAdminUserRow, NewSettingRow, NewTenantRow, TenantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{admin_users, settings, tenants};

/// Diesel-backed implementation of the `TenantRepository` port.
#[derive(Clone)]
pub struct DieselTenantRepository {
    pool: DbPool,
}

impl DieselTenantRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TenantRepositoryError {
    TenantRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    request: Option<&TenantProvisioning>,
) -> TenantRepositoryError {
    let failure = classify_diesel_error(error);
    if let Some(request) = request {
        if failure.violates(TENANT_SLUG_CONSTRAINT) {
            return TenantRepositoryError::slug_taken(request.slug.as_ref());
        }
        if failure.violates(ADMIN_USERNAME_CONSTRAINT) {
            return TenantRepositoryError::username_taken(request.admin_username.as_ref());
        }
    }
    match failure {
        DieselFailure::Connection(message) => TenantRepositoryError::connection(message),
        DieselFailure::Query(message) => TenantRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => TenantRepositoryError::query(format!(
            "unique constraint {} violated",
            constraint.as_deref().unwrap_or("<unknown>")
        )),
    }
}

#[async_trait]
impl TenantRepository for DieselTenantRepository {
    async fn find_by_slug(
        &self,
        slug: &TenantSlug,
    ) -> Result<Option<Tenant>, TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TenantRow> = tenants::table
            .filter(tenants::slug.eq(slug.as_ref()))
            .select(TenantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(Tenant::try_from)
            .transpose()
            .map_err(TenantRepositoryError::query)
    }

    async fn provision(
        &self,
        request: &TenantProvisioning,
    ) -> Result<ProvisionedTenant, TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (tenant_row, admin_row) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let tenant_row: TenantRow = diesel::insert_into(tenants::table)
                        .values(&NewTenantRow {
                            name: request.name.as_ref(),
                            slug: request.slug.as_ref(),
                        })
                        .returning(TenantRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let admin_row: AdminUserRow = diesel::insert_into(admin_users::table)
                        .values(&NewAdminUserRow {
                            tenant_id: tenant_row.id,
                            username: request.admin_username.as_ref(),
                            password_hash: request.password_hash.as_phc(),
                            role: AdminRole::Admin.as_str(),
                        })
                        .returning(AdminUserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let setting_rows: Vec<NewSettingRow<'_>> = request
                        .settings
                        .iter()
                        .map(|setting| NewSettingRow {
                            tenant_id: tenant_row.id,
                            key: setting.key.as_ref(),
                            value: &setting.value,
                            description: setting.description.as_deref(),
                        })
                        .collect();
                    if !setting_rows.is_empty() {
                        diesel::insert_into(settings::table)
                            .values(&setting_rows)
                            .execute(conn)
                            .await?;
                    }

                    Ok((tenant_row, admin_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, Some(request)))?;

        Ok(ProvisionedTenant {
            tenant: Tenant::try_from(tenant_row).map_err(TenantRepositoryError::query)?,
            admin: AdminUser::try_from(admin_row).map_err(TenantRepositoryError::query)?,
        })
    }
}
