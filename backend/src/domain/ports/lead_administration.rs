//! Driving port for the admin dashboard's lead views.

use async_trait::async_trait;

use crate::domain::{Error, Lead, LeadId, LeadSummary, TenantId};

/// Most ids accepted by one bulk delete.
pub const BULK_DELETE_MAX: usize = 1000;

/// Domain use-case port for lead administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadAdministration: Send + Sync {
    /// All leads of the tenant, newest first.
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Lead>, Error>;

    /// Delete one lead; not found when the tenant has no such lead.
    async fn delete(&self, tenant_id: TenantId, id: LeadId) -> Result<(), Error>;

    /// Delete up to [`BULK_DELETE_MAX`] leads and return how many were
    /// removed.
    async fn bulk_delete(&self, tenant_id: TenantId, ids: Vec<LeadId>) -> Result<u64, Error>;

    /// Dashboard aggregates as of now.
    async fn summary(&self, tenant_id: TenantId) -> Result<LeadSummary, Error>;
}
