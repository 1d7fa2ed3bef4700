//! Public registration service.
//!
//! Only the email is checked for duplicates; `duplicate_phone_check` is a
//! stored toggle that registration does not consult. The check is
//! read-then-insert and not serialised: two identical submissions racing
//! each other can both be stored.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{LeadRepository, RegistrationCommand, SettingRepository};
use crate::domain::{Error, Lead, NewLead, Setting, TenantId, WellKnownSetting};

/// Registration service implementing [`RegistrationCommand`].
#[derive(Clone)]
pub struct RegistrationService<L, S> {
    leads: Arc<L>,
    settings: Arc<S>,
}

impl<L, S> RegistrationService<L, S> {
    /// Create a service over the lead and setting repositories.
    pub fn new(leads: Arc<L>, settings: Arc<S>) -> Self {
        Self { leads, settings }
    }
}

impl<L, S> RegistrationService<L, S>
where
    L: LeadRepository,
    S: SettingRepository,
{
    /// A toggle is on only when its stored row says `true`.
    async fn is_enabled(
        &self,
        tenant_id: TenantId,
        setting: WellKnownSetting,
    ) -> Result<bool, Error> {
        let stored = self
            .settings
            .find(tenant_id, &setting.setting_key())
            .await?;
        Ok(stored.as_ref().is_some_and(Setting::is_enabled))
    }
}

#[async_trait]
impl<L, S> RegistrationCommand for RegistrationService<L, S>
where
    L: LeadRepository,
    S: SettingRepository,
{
    async fn register(&self, tenant_id: TenantId, lead: NewLead) -> Result<Lead, Error> {
        if self
            .is_enabled(tenant_id, WellKnownSetting::DuplicateEmailCheck)
            .await?
            && self.leads.email_exists(tenant_id, &lead.email).await?
        {
            return Err(Error::invalid_request(
                "Email already registered. Please use a different email address.",
            )
            .with_details(json!({ "code": "duplicate_email" })));
        }
        Ok(self.leads.insert(tenant_id, &lead).await?)
    }

    async fn registration_count(&self, tenant_id: TenantId) -> Result<u64, Error> {
        Ok(self.leads.count(tenant_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LeadRepositoryError, MockLeadRepository, MockSettingRepository};
    use crate::domain::{ErrorCode, LeadId};
    use chrono::Utc;
    use rstest::rstest;

    fn draft() -> NewLead {
        NewLead::try_from_parts("Jo Lee", "6198712110", "jo@example.com", true)
            .expect("valid lead")
    }

    fn stored(tenant_id: TenantId, lead: &NewLead) -> Lead {
        Lead {
            id: LeadId::new(41),
            tenant_id,
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            email: lead.email.clone(),
            video_watched: lead.video_watched,
            created_at: Utc::now(),
        }
    }

    /// Settings holding only `duplicate_email_check`, when given.
    fn email_check(value: Option<&'static str>) -> MockSettingRepository {
        let mut settings = MockSettingRepository::new();
        settings.expect_find().returning(move |tenant_id, key| {
            let value = match key.well_known() {
                Some(WellKnownSetting::DuplicateEmailCheck) => value,
                _ => None,
            };
            Ok(value.map(|value| Setting {
                id: 1,
                tenant_id,
                key: key.clone(),
                value: value.to_owned(),
                description: None,
                updated_at: Utc::now(),
            }))
        });
        settings
    }

    fn service(
        leads: MockLeadRepository,
        settings: MockSettingRepository,
    ) -> RegistrationService<MockLeadRepository, MockSettingRepository> {
        RegistrationService::new(Arc::new(leads), Arc::new(settings))
    }

    fn inserting(times: usize) -> MockLeadRepository {
        let mut leads = MockLeadRepository::new();
        leads
            .expect_insert()
            .times(times)
            .returning(|tenant_id, lead| Ok(stored(tenant_id, lead)));
        leads
    }

    #[tokio::test]
    async fn enabled_email_check_rejects_a_known_email() {
        let mut leads = MockLeadRepository::new();
        leads.expect_email_exists().times(1).return_once(|_, _| Ok(true));
        leads.expect_insert().times(0);

        let error = service(leads, email_check(Some("true")))
            .register(TenantId::new(1), draft())
            .await
            .expect_err("duplicate email");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.message(),
            "Email already registered. Please use a different email address."
        );
        assert_eq!(
            error.details().and_then(|details| details.get("code")),
            Some(&json!("duplicate_email"))
        );
    }

    #[tokio::test]
    async fn enabled_email_check_admits_a_new_email() {
        let mut leads = inserting(1);
        leads.expect_email_exists().times(1).return_once(|_, _| Ok(false));

        let lead = service(leads, email_check(Some("true")))
            .register(TenantId::new(2), draft())
            .await
            .expect("registration stored");
        assert_eq!(lead.tenant_id, TenantId::new(2));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("false"))]
    #[case(Some("FALSE"))]
    #[case(Some("off"))]
    #[tokio::test]
    async fn email_check_is_off_unless_stored_as_true(#[case] value: Option<&'static str>) {
        let mut leads = inserting(1);
        leads.expect_email_exists().times(0);

        let lead = service(leads, email_check(value))
            .register(TenantId::new(5), draft())
            .await
            .expect("registration stored");
        assert_eq!(lead.tenant_id, TenantId::new(5));
        assert_eq!(lead.email.as_ref(), "jo@example.com");
    }

    #[tokio::test]
    async fn repeated_submissions_are_all_stored_without_the_email_check() {
        let mut leads = inserting(3);
        leads.expect_email_exists().times(0);
        let service = service(leads, email_check(Some("false")));

        for _ in 0..3 {
            service
                .register(TenantId::new(1), draft())
                .await
                .expect("registration stored");
        }
    }

    #[tokio::test]
    async fn storage_failures_become_internal_errors() {
        let mut leads = MockLeadRepository::new();
        leads
            .expect_email_exists()
            .return_once(|_, _| Err(LeadRepositoryError::connection("refused")));

        let error = service(leads, email_check(Some("true")))
            .register(TenantId::new(1), draft())
            .await
            .expect_err("storage failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn counts_registrations_for_the_tenant() {
        let mut leads = MockLeadRepository::new();
        leads
            .expect_count()
            .withf(|tenant_id| *tenant_id == TenantId::new(9))
            .return_once(|_| Ok(4));

        let count = service(leads, MockSettingRepository::new())
            .registration_count(TenantId::new(9))
            .await
            .expect("count");
        assert_eq!(count, 4);
    }
}
