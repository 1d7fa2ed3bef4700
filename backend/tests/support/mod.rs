//! Shared harness for the HTTP integration suites.
//!
//! Builds the full application over one in-memory store with the real
//! domain services, the same wiring the server uses when no database is
//! configured. Mail goes to a recording mailer so suites can observe sends.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::{Value, json};

use scratch_backend::Trace;
use scratch_backend::domain::ports::{IssuedCredentials, WinnerMailer, WinnerMailerError};
use scratch_backend::domain::{
    AdminAuthService, GameLayout, LeadAdminService, RegistrationService, SettingsService,
    TenantDirectoryService, TenantSlug, WinnerNotice, WinnerNotificationService,
};
use scratch_backend::inbound::http::health::{HealthState, live, ready};
use scratch_backend::inbound::http::routes::configure_api;
use scratch_backend::inbound::http::session_config::SESSION_COOKIE_NAME;
use scratch_backend::inbound::http::state::{HttpState, HttpStatePorts};
use scratch_backend::inbound::http::validation::{json_config, path_config};
use scratch_backend::outbound::memory::MemoryStore;

/// Mailer that records every notice and answers with a fixed result.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<WinnerNotice>>>,
    pub reject: bool,
}

#[async_trait]
impl WinnerMailer for RecordingMailer {
    async fn send(&self, notice: &WinnerNotice) -> Result<(), WinnerMailerError> {
        self.sent
            .lock()
            .expect("mailer lock")
            .push(notice.clone());
        if self.reject {
            Err(WinnerMailerError::rejected(422_u16, "domain not verified"))
        } else {
            Ok(())
        }
    }
}

/// One application instance and its backing store.
pub struct World {
    pub store: Arc<MemoryStore>,
    pub mailer: RecordingMailer,
    state: web::Data<HttpState>,
    key: Key,
}

impl World {
    pub fn new() -> Self {
        Self::build(true, RecordingMailer::default())
    }

    pub fn without_auto_provision() -> Self {
        Self::build(false, RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self::build(true, mailer)
    }

    fn build(auto_provision: bool, mailer: RecordingMailer) -> Self {
        let store = Arc::new(MemoryStore::default());
        let ports = HttpStatePorts {
            tenants: Arc::new(TenantDirectoryService::new(
                store.clone(),
                store.clone(),
                auto_provision,
            )),
            registrations: Arc::new(RegistrationService::new(store.clone(), store.clone())),
            auth: Arc::new(AdminAuthService::new(store.clone())),
            leads: Arc::new(LeadAdminService::new(store.clone(), Arc::new(DefaultClock))),
            settings: Arc::new(SettingsService::new(store.clone())),
            notifications: Arc::new(WinnerNotificationService::new(Arc::new(mailer.clone()))),
        };
        let game = GameLayout::launch_default().expect("default layout");
        Self {
            store,
            mailer,
            state: web::Data::new(HttpState::new(ports, game)),
            key: Key::generate(),
        }
    }

    /// Application wired like the server, minus CORS and TLS-only cookies.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_secure(false)
            .build();
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        App::new()
            .app_data(self.state.clone())
            .app_data(health)
            .app_data(json_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(web::scope("/api").wrap(session).configure(configure_api))
            .service(ready)
            .service(live)
    }

    /// Provision `slug` and return its one-time credentials.
    pub async fn provision(&self, slug: &str) -> IssuedCredentials {
        let slug = TenantSlug::new(slug).expect("valid slug");
        self.state
            .tenants
            .provision(&slug, None)
            .await
            .expect("provisioned")
    }

    pub fn sent_mail(&self) -> Vec<WinnerNotice> {
        self.mailer.sent.lock().expect("mailer lock").clone()
    }
}

/// Status, headers and parsed body of one call.
pub struct Reply {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub cookie: Option<Cookie<'static>>,
    pub body: Value,
}

pub async fn send<S, B>(app: &S, req: test::TestRequest) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        trace_id,
        cookie,
        body,
    }
}

/// Log in and return the session cookie.
pub async fn login<S, B>(app: &S, credentials: &IssuedCredentials) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "username": credentials.username.as_ref(),
                "password": credentials.password.as_str(),
            })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.cookie.expect("session cookie")
}

pub fn lead_body(email: &str, phone: &str) -> Value {
    json!({
        "name": "Jo Lee",
        "phone": phone,
        "email": email,
        "videoWatched": true
    })
}
