//! Tests for the tenant directory service.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAdminRepository, MockTenantRepository, ProvisionedTenant};
use crate::domain::{AdminId, AdminRole, AdminUser, ErrorCode, TenantId};

fn slug(raw: &str) -> TenantSlug {
    TenantSlug::new(raw).expect("valid slug")
}

fn tenant(raw: &str) -> Tenant {
    let slug = slug(raw);
    Tenant {
        id: TenantId::new(7),
        name: TenantName::from_slug(&slug),
        slug,
        created_at: Utc::now(),
    }
}

fn admin_for(tenant: &Tenant, username: &str) -> AdminUser {
    AdminUser {
        id: AdminId::new(3),
        tenant_id: tenant.id,
        username: AdminUsername::new(username).expect("valid username"),
        password_hash: PasswordHash::from_stored("$argon2id$placeholder"),
        role: AdminRole::Admin,
        created_at: Utc::now(),
    }
}

fn echo_provisioning(request: &TenantProvisioning) -> ProvisionedTenant {
    let tenant = Tenant {
        id: TenantId::new(11),
        name: request.name.clone(),
        slug: request.slug.clone(),
        created_at: Utc::now(),
    };
    let admin = AdminUser {
        id: AdminId::new(12),
        tenant_id: tenant.id,
        username: request.admin_username.clone(),
        password_hash: request.password_hash.clone(),
        role: AdminRole::Admin,
        created_at: Utc::now(),
    };
    ProvisionedTenant { tenant, admin }
}

fn service(
    tenants: MockTenantRepository,
    admins: MockAdminRepository,
    auto_provision: bool,
) -> TenantDirectoryService<MockTenantRepository, MockAdminRepository> {
    TenantDirectoryService::new(Arc::new(tenants), Arc::new(admins), auto_provision)
}

#[tokio::test]
async fn resolve_returns_existing_tenant_without_provisioning() {
    let existing = tenant("acme");
    let mut tenants = MockTenantRepository::new();
    let found = existing.clone();
    tenants
        .expect_find_by_slug()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    tenants.expect_provision().times(0);

    let resolved = service(tenants, MockAdminRepository::new(), true)
        .resolve(&slug("acme"))
        .await
        .expect("tenant resolves");
    assert_eq!(resolved, existing);
}

#[tokio::test]
async fn resolve_provisions_unknown_slug_with_seeded_settings() {
    let mut tenants = MockTenantRepository::new();
    tenants
        .expect_find_by_slug()
        .times(1)
        .return_once(|_| Ok(None));
    tenants
        .expect_provision()
        .withf(|request| {
            request.admin_username.as_ref() == "admin@acme.com"
                && request.name.as_ref() == "acme"
                && request.settings == SettingUpdate::defaults()
                && request.password_hash.as_phc().starts_with("$argon2id$")
        })
        .times(1)
        .returning(|request| Ok(echo_provisioning(request)));

    let resolved = service(tenants, MockAdminRepository::new(), true)
        .resolve(&slug("acme"))
        .await
        .expect("tenant provisioned");
    assert_eq!(resolved.slug.as_ref(), "acme");
}

#[tokio::test]
async fn resolve_rereads_after_losing_a_provisioning_race() {
    let winner = tenant("acme");
    let mut tenants = MockTenantRepository::new();
    let mut lookups = 0;
    let reread = winner.clone();
    tenants
        .expect_find_by_slug()
        .times(2)
        .returning(move |_| {
            lookups += 1;
            Ok((lookups > 1).then(|| reread.clone()))
        });
    tenants
        .expect_provision()
        .times(1)
        .return_once(|_| Err(TenantRepositoryError::slug_taken("acme")));

    let resolved = service(tenants, MockAdminRepository::new(), true)
        .resolve(&slug("acme"))
        .await
        .expect("race resolves to the winner");
    assert_eq!(resolved, winner);
}

#[tokio::test]
async fn resolve_falls_back_when_the_default_username_is_taken() {
    let attempted = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&attempted);
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_slug().times(1).return_once(|_| Ok(None));
    tenants
        .expect_provision()
        .times(2)
        .returning(move |request| {
            let username = request.admin_username.to_string();
            seen.lock().expect("attempts lock").push(username.clone());
            if username == "admin@globex.com" {
                Err(TenantRepositoryError::username_taken(username))
            } else {
                Ok(echo_provisioning(request))
            }
        });

    let resolved = service(tenants, MockAdminRepository::new(), true)
        .resolve(&slug("globex"))
        .await
        .expect("globex resolves despite the taken username");
    assert_eq!(resolved.slug.as_ref(), "globex");

    let attempted = attempted.lock().expect("attempts lock");
    assert_eq!(attempted.len(), 2);
    assert!(attempted[1].starts_with("admin-"));
    assert!(attempted[1].ends_with("@globex.com"));
}

#[tokio::test]
async fn resolve_reports_an_internal_error_when_the_fallback_is_taken_too() {
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_slug().times(1).return_once(|_| Ok(None));
    tenants
        .expect_provision()
        .times(2)
        .returning(|request| {
            Err(TenantRepositoryError::username_taken(
                request.admin_username.to_string(),
            ))
        });

    let error = service(tenants, MockAdminRepository::new(), true)
        .resolve(&slug("globex"))
        .await
        .expect_err("both usernames taken");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn resolve_without_auto_provision_reports_not_found() {
    let mut tenants = MockTenantRepository::new();
    tenants
        .expect_find_by_slug()
        .times(1)
        .return_once(|_| Ok(None));
    tenants.expect_provision().times(0);

    let error = service(tenants, MockAdminRepository::new(), false)
        .resolve(&slug("acme"))
        .await
        .expect_err("unknown tenant");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Tenant not found");
}

#[tokio::test]
async fn provision_returns_a_verifiable_password() {
    let mut tenants = MockTenantRepository::new();
    tenants
        .expect_provision()
        .times(1)
        .returning(|request| Ok(echo_provisioning(request)));
    let name = TenantName::new("Acme Plumbing").expect("valid name");

    let issued = service(tenants, MockAdminRepository::new(), true)
        .provision(&slug("acme"), Some(name))
        .await
        .expect("provisioned");

    assert_eq!(issued.tenant.name.as_ref(), "Acme Plumbing");
    assert_eq!(issued.username.as_ref(), "admin@acme.com");
    assert!(issued.password.starts_with("acme-"));
    assert!(!format!("{issued:?}").contains(issued.password.as_str()));
}

#[rstest]
#[case(TenantRepositoryError::slug_taken("acme"), ErrorCode::Conflict)]
#[case(TenantRepositoryError::username_taken("admin@acme.com"), ErrorCode::Conflict)]
#[case(TenantRepositoryError::connection("refused"), ErrorCode::InternalError)]
#[tokio::test]
async fn provision_maps_repository_failures(
    #[case] failure: TenantRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut tenants = MockTenantRepository::new();
    tenants
        .expect_provision()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = service(tenants, MockAdminRepository::new(), true)
        .provision(&slug("acme"), None)
        .await
        .expect_err("provisioning fails");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn rotate_stores_a_new_hash_for_the_current_admin() {
    let existing = tenant("acme");
    let admin = admin_for(&existing, "owner@acme.com");
    let mut tenants = MockTenantRepository::new();
    let found = existing.clone();
    tenants
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(found)));
    let mut admins = MockAdminRepository::new();
    let current = admin.clone();
    admins
        .expect_find_by_tenant()
        .return_once(move |_| Ok(Some(current)));
    admins
        .expect_update_credentials()
        .withf(|id, change| {
            *id == AdminId::new(3) && change.username.is_none() && change.password_hash.is_some()
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(admin)));

    let issued = service(tenants, admins, true)
        .rotate_admin_password(&slug("acme"))
        .await
        .expect("rotated");
    assert_eq!(issued.username.as_ref(), "owner@acme.com");
    assert!(issued.password.starts_with("acme-"));
}

#[tokio::test]
async fn rotate_for_unknown_tenant_is_not_found() {
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_slug().return_once(|_| Ok(None));

    let error = service(tenants, MockAdminRepository::new(), true)
        .rotate_admin_password(&slug("ghost"))
        .await
        .expect_err("unknown tenant");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
