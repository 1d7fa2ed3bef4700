//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, MailerConfig, ServerConfig};

use state_builders::build_http_state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::{CookieSessionStore, RedisSessionStore, SessionStore},
};
use actix_web::body::MessageBody;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::info;

use scratch_backend::Trace;
#[cfg(debug_assertions)]
use scratch_backend::doc::ApiDoc;
use scratch_backend::domain::TRACE_ID_HEADER;
use scratch_backend::inbound::http::health::{HealthState, live, ready};
use scratch_backend::inbound::http::routes::configure_api;
use scratch_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, SESSION_TTL};
use scratch_backend::inbound::http::state::HttpState;
use scratch_backend::inbound::http::validation::{json_config, path_config};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const CORS_MAX_AGE_SECS: usize = 3600;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    cors_origins: Arc<[String]>,
    #[cfg(feature = "metrics")]
    metrics: PrometheusMetrics,
}

/// Credentialed CORS for the configured origins; with none configured only
/// same-origin requests succeed.
fn build_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .supports_credentials()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .max_age(CORS_MAX_AGE_SECS)
}

fn build_app<S>(
    deps: AppDependencies,
    store: S,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SessionStore + 'static,
{
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        cors_origins,
        #[cfg(feature = "metrics")]
        metrics: _,
    } = deps;

    let session = SessionMiddleware::builder(store, key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
        .build();

    let api = web::scope("/api").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(path_config())
        .wrap(build_cors(&cors_origins))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("scratch")
        .endpoint("/metrics")
        .registry(prometheus::Registry::new())
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

fn serve<S, F>(
    deps: AppDependencies,
    bind_addr: std::net::SocketAddr,
    make_store: F,
) -> std::io::Result<Server>
where
    S: SessionStore + 'static,
    F: Fn() -> S + Clone + Send + 'static,
{
    let server = HttpServer::new(move || {
        #[cfg(feature = "metrics")]
        let metrics = deps.metrics.clone();
        let app = build_app(deps.clone(), make_store());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics);

        app
    })
    .bind(bind_addr)?
    .run();
    Ok(server)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding and adapter settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the adapters cannot be built, the
/// session store is unreachable, or binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        cors_origins,
        auto_provision: _,
        db_pool: _,
        session_redis_url,
        mailer: _,
    } = config;

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        key,
        cookie_secure,
        same_site,
        cors_origins: cors_origins.into(),
        #[cfg(feature = "metrics")]
        metrics: make_metrics()?,
    };

    let server = match session_redis_url {
        Some(url) => {
            let store = RedisSessionStore::new(url)
                .await
                .map_err(|err| std::io::Error::other(format!("connect session store: {err}")))?;
            info!("admin sessions kept in Redis");
            serve(deps, bind_addr, move || store.clone())?
        }
        None => serve(deps, bind_addr, CookieSessionStore::default)?,
    };

    health_state.mark_ready();
    info!(%bind_addr, "listening");
    Ok(server)
}
