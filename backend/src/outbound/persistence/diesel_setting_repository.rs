//! PostgreSQL-backed `SettingRepository`.
//!
//! Upserts go through `ON CONFLICT (tenant_id, key)`; an omitted
//! description is written as `COALESCE(excluded.description,
//! settings.description)` so the stored text survives.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SettingRepository, SettingRepositoryError};
use crate::domain::{Setting, SettingKey, SettingUpdate, TenantId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewSettingRow, SettingRow};
use super::pool::{DbPool, PoolError};
use super::schema::settings;

diesel::define_sql_function! {
    /// SQL `COALESCE` over two nullable varchars.
    fn coalesce(
        x: diesel::sql_types::Nullable<diesel::sql_types::Varchar>,
        y: diesel::sql_types::Nullable<diesel::sql_types::Varchar>,
    ) -> diesel::sql_types::Nullable<diesel::sql_types::Varchar>;
}

/// Diesel-backed implementation of the `SettingRepository` port.
#[derive(Clone)]
pub struct DieselSettingRepository {
    pool: DbPool,
}

impl DieselSettingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SettingRepositoryError {
    SettingRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> SettingRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => SettingRepositoryError::connection(message),
        DieselFailure::Query(message) => SettingRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            SettingRepositoryError::query("concurrent setting insert")
        }
    }
}

fn into_domain(row: SettingRow) -> Result<Setting, SettingRepositoryError> {
    Setting::try_from(row).map_err(SettingRepositoryError::query)
}

#[async_trait]
impl SettingRepository for DieselSettingRepository {
    async fn find(
        &self,
        tenant_id: TenantId,
        key: &SettingKey,
    ) -> Result<Option<Setting>, SettingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SettingRow> = settings::table
            .filter(settings::tenant_id.eq(tenant_id.get()))
            .filter(settings::key.eq(key.as_ref()))
            .select(SettingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_domain).transpose()
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Setting>, SettingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SettingRow> = settings::table
            .filter(settings::tenant_id.eq(tenant_id.get()))
            .order(settings::key.asc())
            .select(SettingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(into_domain).collect()
    }

    async fn upsert(
        &self,
        tenant_id: TenantId,
        update: &SettingUpdate,
    ) -> Result<Setting, SettingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SettingRow = diesel::insert_into(settings::table)
            .values(&NewSettingRow {
                tenant_id: tenant_id.get(),
                key: update.key.as_ref(),
                value: &update.value,
                description: update.description.as_deref(),
            })
            .on_conflict((settings::tenant_id, settings::key))
            .do_update()
            .set((
                settings::value.eq(excluded(settings::value)),
                settings::description
                    .eq(coalesce(excluded(settings::description), settings::description)),
                settings::updated_at.eq(now),
            ))
            .returning(SettingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain(row)
    }
}
