//! Driving port for tenant settings.

use async_trait::async_trait;

use crate::domain::{Error, Setting, SettingKey, SettingUpdate, TenantId};

/// Domain use-case port for settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantSettings: Send + Sync {
    /// One stored setting, if present.
    async fn find(&self, tenant_id: TenantId, key: &SettingKey) -> Result<Option<Setting>, Error>;

    /// All settings ordered by key.
    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Setting>, Error>;

    /// Upsert one setting.
    async fn put(&self, tenant_id: TenantId, update: SettingUpdate) -> Result<Setting, Error>;
}
