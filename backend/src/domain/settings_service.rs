//! Tenant settings service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{SettingRepository, TenantSettings};
use crate::domain::{Error, Setting, SettingKey, SettingUpdate, TenantId};

/// Settings service implementing [`TenantSettings`].
#[derive(Clone)]
pub struct SettingsService<S> {
    settings: Arc<S>,
}

impl<S> SettingsService<S> {
    /// Create a service over the setting repository.
    pub fn new(settings: Arc<S>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl<S> TenantSettings for SettingsService<S>
where
    S: SettingRepository,
{
    async fn find(&self, tenant_id: TenantId, key: &SettingKey) -> Result<Option<Setting>, Error> {
        Ok(self.settings.find(tenant_id, key).await?)
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Setting>, Error> {
        Ok(self.settings.list(tenant_id).await?)
    }

    async fn put(&self, tenant_id: TenantId, update: SettingUpdate) -> Result<Setting, Error> {
        let setting = self.settings.upsert(tenant_id, &update).await?;
        tracing::info!(tenant_id = %tenant_id, key = %setting.key, "setting updated");
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockSettingRepository, SettingRepositoryError};
    use crate::domain::{ErrorCode, WellKnownSetting};
    use chrono::Utc;

    #[tokio::test]
    async fn put_passes_the_update_through() {
        let update = SettingUpdate::new(
            WellKnownSetting::VideoRequirementEnabled.setting_key(),
            "false",
            None,
        )
        .expect("valid update");
        let mut settings = MockSettingRepository::new();
        settings
            .expect_upsert()
            .withf(|tenant_id, update| *tenant_id == TenantId::new(4) && update.value == "false")
            .times(1)
            .returning(|tenant_id, update| {
                Ok(Setting {
                    id: 9,
                    tenant_id,
                    key: update.key.clone(),
                    value: update.value.clone(),
                    description: Some("kept".to_owned()),
                    updated_at: Utc::now(),
                })
            });

        let stored = SettingsService::new(Arc::new(settings))
            .put(TenantId::new(4), update)
            .await
            .expect("upsert succeeds");
        assert!(!stored.is_enabled());
        assert_eq!(stored.description.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn list_failures_become_internal_errors() {
        let mut settings = MockSettingRepository::new();
        settings
            .expect_list()
            .return_once(|_| Err(SettingRepositoryError::query("syntax error")));

        let error = SettingsService::new(Arc::new(settings))
            .list(TenantId::new(1))
            .await
            .expect_err("query fails");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
