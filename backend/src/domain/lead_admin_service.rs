//! Lead administration service backing the admin dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{BULK_DELETE_MAX, LeadAdministration, LeadRepository};
use crate::domain::validation::{FieldIssue, FieldIssues};
use crate::domain::{Error, Lead, LeadId, LeadSummary, TenantId};

/// Lead administration service implementing [`LeadAdministration`].
#[derive(Clone)]
pub struct LeadAdminService<L> {
    leads: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> LeadAdminService<L> {
    /// Create a service; `clock` anchors the summary's day and week buckets.
    pub fn new(leads: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { leads, clock }
    }
}

#[async_trait]
impl<L> LeadAdministration for LeadAdminService<L>
where
    L: LeadRepository,
{
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Lead>, Error> {
        Ok(self.leads.list(tenant_id).await?)
    }

    async fn delete(&self, tenant_id: TenantId, id: LeadId) -> Result<(), Error> {
        if self.leads.delete(tenant_id, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Registration not found"))
        }
    }

    async fn bulk_delete(&self, tenant_id: TenantId, ids: Vec<LeadId>) -> Result<u64, Error> {
        if ids.len() > BULK_DELETE_MAX {
            return Err(FieldIssues::from(FieldIssue::new(
                "ids",
                "too_many",
                format!("At most {BULK_DELETE_MAX} registrations can be deleted at once"),
            ))
            .into());
        }
        if ids.is_empty() {
            return Ok(0);
        }
        Ok(self.leads.delete_many(tenant_id, &ids).await?)
    }

    async fn summary(&self, tenant_id: TenantId) -> Result<LeadSummary, Error> {
        let leads = self.leads.list(tenant_id).await?;
        Ok(LeadSummary::from_leads(&leads, self.clock.utc()))
    }
}
