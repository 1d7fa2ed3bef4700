//! Port for lead persistence. Every call is scoped by tenant.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Lead, LeadId, NewLead, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lead repository adapters.
    pub enum LeadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "lead repository connection failed: {message}"; internal,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "lead repository query failed: {message}"; internal,
    }
}

/// Port for storing and administering leads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Store a new lead and return it with its id and timestamp.
    async fn insert(&self, tenant_id: TenantId, lead: &NewLead)
    -> Result<Lead, LeadRepositoryError>;

    /// Whether the tenant already has a lead with this email.
    async fn email_exists(
        &self,
        tenant_id: TenantId,
        email: &EmailAddress,
    ) -> Result<bool, LeadRepositoryError>;

    /// Number of leads the tenant holds.
    async fn count(&self, tenant_id: TenantId) -> Result<u64, LeadRepositoryError>;

    /// All leads of the tenant, newest first (`created_at` then `id`,
    /// descending).
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Delete one lead; `false` when the tenant has no lead with that id.
    async fn delete(&self, tenant_id: TenantId, id: LeadId) -> Result<bool, LeadRepositoryError>;

    /// Delete every listed lead the tenant owns and return how many went.
    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[LeadId],
    ) -> Result<u64, LeadRepositoryError>;
}
