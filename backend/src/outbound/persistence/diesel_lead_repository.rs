//! PostgreSQL-backed `LeadRepository`. Every statement filters on
//! `tenant_id`.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LeadRepository, LeadRepositoryError};
use crate::domain::{EmailAddress, Lead, LeadId, NewLead, TenantId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewRegistrationRow, RegistrationRow};
use super::pool::{DbPool, PoolError};
use super::schema::registrations;

/// Diesel-backed implementation of the `LeadRepository` port.
#[derive(Clone)]
pub struct DieselLeadRepository {
    pool: DbPool,
}

impl DieselLeadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LeadRepositoryError {
    LeadRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> LeadRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => LeadRepositoryError::connection(message),
        DieselFailure::Query(message) => LeadRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            LeadRepositoryError::query("unexpected unique violation")
        }
    }
}

fn affected_rows(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl LeadRepository for DieselLeadRepository {
    async fn insert(
        &self,
        tenant_id: TenantId,
        lead: &NewLead,
    ) -> Result<Lead, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: RegistrationRow = diesel::insert_into(registrations::table)
            .values(&NewRegistrationRow {
                tenant_id: tenant_id.get(),
                name: lead.name.as_ref(),
                phone: lead.phone.as_ref(),
                email: lead.email.as_ref(),
                video_watched: lead.video_watched,
            })
            .returning(RegistrationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Lead::try_from(row).map_err(LeadRepositoryError::query)
    }

    async fn email_exists(
        &self,
        tenant_id: TenantId,
        email: &EmailAddress,
    ) -> Result<bool, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            registrations::table
                .filter(registrations::tenant_id.eq(tenant_id.get()))
                .filter(registrations::email.eq(email.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count(&self, tenant_id: TenantId) -> Result<u64, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = registrations::table
            .filter(registrations::tenant_id.eq(tenant_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RegistrationRow> = registrations::table
            .filter(registrations::tenant_id.eq(tenant_id.get()))
            .order((registrations::created_at.desc(), registrations::id.desc()))
            .select(RegistrationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(Lead::try_from)
            .collect::<Result<_, _>>()
            .map_err(LeadRepositoryError::query)
    }

    async fn delete(&self, tenant_id: TenantId, id: LeadId) -> Result<bool, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            registrations::table
                .filter(registrations::tenant_id.eq(tenant_id.get()))
                .filter(registrations::id.eq(id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[LeadId],
    ) -> Result<u64, LeadRepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            registrations::table
                .filter(registrations::tenant_id.eq(tenant_id.get()))
                .filter(registrations::id.eq_any(raw_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected_rows(deleted))
    }
}
