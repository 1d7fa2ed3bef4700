//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAdminAuth, MockLeadAdministration, MockRegistrationCommand, MockTenantDirectory,
    MockTenantSettings, MockWinnerNotifications,
};
use crate::domain::{
    AdminId, AdminRole, AdminUser, AdminUsername, GameLayout, PasswordHash, Tenant, TenantId,
    TenantName, TenantSlug,
};

use super::routes::configure_api;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::{HttpState, HttpStatePorts};
use super::validation::{json_config, path_config};

/// Cookie-backed session middleware with a throwaway key and no `Secure`
/// flag, so plain-HTTP test requests round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; unexpected calls panic.
#[derive(Default)]
pub struct MockPorts {
    pub tenants: MockTenantDirectory,
    pub registrations: MockRegistrationCommand,
    pub auth: MockAdminAuth,
    pub leads: MockLeadAdministration,
    pub settings: MockTenantSettings,
    pub notifications: MockWinnerNotifications,
}

impl MockPorts {
    /// Accept any login as `admin`.
    pub fn allow_login(&mut self, admin: AdminUser) {
        self.auth
            .expect_login()
            .returning(move |_| Ok(admin.clone()));
    }

    /// Answer `lookup` and `resolve` for `tenant`'s slug; other slugs are
    /// unknown.
    pub fn known_tenant(&mut self, tenant: Tenant) {
        let found = tenant.clone();
        self.tenants.expect_lookup().returning(move |slug| {
            Ok((slug == &found.slug).then(|| found.clone()))
        });
        self.tenants.expect_resolve().returning(move |slug| {
            if slug == &tenant.slug {
                Ok(tenant.clone())
            } else {
                Err(crate::domain::Error::not_found("Tenant not found"))
            }
        });
    }

    pub fn into_state(self) -> HttpState {
        let ports = HttpStatePorts {
            tenants: Arc::new(self.tenants),
            registrations: Arc::new(self.registrations),
            auth: Arc::new(self.auth),
            leads: Arc::new(self.leads),
            settings: Arc::new(self.settings),
            notifications: Arc::new(self.notifications),
        };
        HttpState::new(ports, GameLayout::launch_default().expect("default layout"))
    }
}

/// The full `/api` surface over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(path_config())
        .wrap(test_session_middleware())
        .service(web::scope("/api").configure(configure_api))
}

/// Tenant fixture with a stable creation time.
pub fn tenant(id: i32, slug: &str) -> Tenant {
    let slug = TenantSlug::new(slug).expect("valid slug");
    Tenant {
        id: TenantId::new(id),
        name: TenantName::from_slug(&slug),
        slug,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Admin fixture owned by `tenant`.
pub fn admin_of(tenant: &Tenant) -> AdminUser {
    AdminUser {
        id: AdminId::new(tenant.id.get() * 10),
        tenant_id: tenant.id,
        username: AdminUsername::new(tenant.slug.admin_username()).expect("valid username"),
        password_hash: PasswordHash::from_stored("$argon2id$v=19$stub"),
        role: AdminRole::Admin,
        created_at: tenant.created_at,
    }
}

/// Log in through `POST /api/auth/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "admin@acme.com", "password": "secret" }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}
