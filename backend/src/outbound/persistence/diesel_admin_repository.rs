//! PostgreSQL-backed `AdminRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminRepository, AdminRepositoryError, CredentialChange};
use crate::domain::{AdminId, AdminUser, AdminUsername, TenantId};

use super::diesel_error_mapping::{
    ADMIN_USERNAME_CONSTRAINT, DieselFailure, classify_diesel_error, pool_error_message,
};
use super::models::{AdminCredentialsUpdate, AdminUserRow};
use super::pool::{DbPool, PoolError};
use super::schema::admin_users;

/// Diesel-backed implementation of the `AdminRepository` port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdminRepositoryError {
    AdminRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    username: Option<&AdminUsername>,
) -> AdminRepositoryError {
    let failure = classify_diesel_error(error);
    if let Some(username) = username.filter(|_| failure.violates(ADMIN_USERNAME_CONSTRAINT)) {
        return AdminRepositoryError::username_taken(username.as_ref());
    }
    match failure {
        DieselFailure::Connection(message) => AdminRepositoryError::connection(message),
        DieselFailure::Query(message) => AdminRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            AdminRepositoryError::query("unexpected unique violation")
        }
    }
}

fn into_domain(row: Option<AdminUserRow>) -> Result<Option<AdminUser>, AdminRepositoryError> {
    row.map(AdminUser::try_from)
        .transpose()
        .map_err(AdminRepositoryError::query)
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_username(
        &self,
        username: &AdminUsername,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admin_users::table
            .filter(admin_users::username.eq(username.as_ref()))
            .select(AdminUserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        into_domain(row)
    }

    async fn find_by_id(&self, id: AdminId) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admin_users::table
            .find(id.get())
            .select(AdminUserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        into_domain(row)
    }

    async fn find_by_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admin_users::table
            .filter(admin_users::tenant_id.eq(tenant_id.get()))
            .order(admin_users::id.asc())
            .select(AdminUserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        into_domain(row)
    }

    async fn update_credentials(
        &self,
        id: AdminId,
        change: &CredentialChange,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        if change.username.is_none() && change.password_hash.is_none() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(admin_users::table.find(id.get()))
            .set(&AdminCredentialsUpdate {
                username: change.username.as_ref().map(|name| name.as_ref()),
                password_hash: change.password_hash.as_ref().map(|hash| hash.as_phc()),
            })
            .returning(AdminUserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, change.username.as_ref()))?;
        into_domain(row)
    }
}
