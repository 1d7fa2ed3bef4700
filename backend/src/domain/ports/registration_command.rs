//! Driving port for public lead capture.

use async_trait::async_trait;

use crate::domain::{Error, Lead, NewLead, TenantId};

/// Domain use-case port for registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Store a registration, rejecting a repeated email while the tenant's
    /// `duplicate_email_check` is on.
    ///
    /// Duplicates are invalid requests whose `details.code` is
    /// `duplicate_email`.
    async fn register(&self, tenant_id: TenantId, lead: NewLead) -> Result<Lead, Error>;

    /// Number of registrations the tenant holds.
    async fn registration_count(&self, tenant_id: TenantId) -> Result<u64, Error>;
}
