//! Port for per-tenant settings.

use async_trait::async_trait;

use crate::domain::{Setting, SettingKey, SettingUpdate, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by setting repository adapters.
    pub enum SettingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "setting repository connection failed: {message}"; internal,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "setting repository query failed: {message}"; internal,
    }
}

/// Port for reading and upserting settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingRepository: Send + Sync {
    /// Fetch one setting.
    async fn find(
        &self,
        tenant_id: TenantId,
        key: &SettingKey,
    ) -> Result<Option<Setting>, SettingRepositoryError>;

    /// All settings of the tenant ordered by key.
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Setting>, SettingRepositoryError>;

    /// Insert or update by `(tenant, key)`. A `None` description keeps the
    /// stored one; `updated_at` is always bumped.
    async fn upsert(
        &self,
        tenant_id: TenantId,
        update: &SettingUpdate,
    ) -> Result<Setting, SettingRepositoryError>;
}
