//! Process configuration and the server configuration object built from it.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use scratch_backend::inbound::http::session_config::SessionSettings;
use scratch_backend::outbound::email::DEFAULT_RESEND_ENDPOINT;
use scratch_backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_EMAIL_FROM: &str = "Done For You Pros Winner <winner@amazingworldmedia.com>";
const DEFAULT_EMAIL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings read from `SCRATCH_*` environment variables and CLI flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCRATCH")]
pub struct AppSettings {
    /// PostgreSQL URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// Origins allowed to make credentialed requests; comma separated in
    /// the environment.
    pub cors_origins: Option<Vec<String>>,
    /// Create unknown tenants on first use (default `true`).
    pub auto_provision: Option<bool>,
    /// Resend API key; winner emails fail fast when absent.
    pub resend_api_key: Option<String>,
    /// Resend send-email endpoint override.
    pub resend_endpoint: Option<String>,
    /// `From` header of outgoing mail.
    pub email_from: Option<String>,
    /// Per-request mail timeout.
    pub email_timeout_secs: Option<u64>,
    /// Redis URL for server-side sessions.
    pub session_redis_url: Option<String>,
    /// Upper bound of the database pool.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the configured value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Non-empty, trimmed CORS origins.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .iter()
            .flatten()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn auto_provision(&self) -> bool {
        self.auto_provision.unwrap_or(true)
    }

    pub fn resend_endpoint(&self) -> &str {
        self.resend_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_RESEND_ENDPOINT)
    }

    pub fn email_from(&self) -> &str {
        self.email_from.as_deref().unwrap_or(DEFAULT_EMAIL_FROM)
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(
            self.email_timeout_secs
                .unwrap_or(DEFAULT_EMAIL_TIMEOUT_SECS),
        )
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) auto_provision: bool,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) session_redis_url: Option<String>,
    pub(crate) mailer: MailerConfig,
}

/// Outgoing mail settings.
pub struct MailerConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) endpoint: String,
    pub(crate) from: String,
    pub(crate) timeout: Duration,
}

impl MailerConfig {
    /// Mail settings taken from the process configuration.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            api_key: settings.resend_api_key.clone(),
            endpoint: settings.resend_endpoint().to_owned(),
            from: settings.email_from().to_owned(),
            timeout: settings.email_timeout(),
        }
    }
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, mailer: MailerConfig) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            cors_origins: Vec::new(),
            auto_provision: true,
            db_pool: None,
            session_redis_url: None,
            mailer,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without one the server runs on the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Origins allowed to send credentialed cross-origin requests.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Whether unknown slugs are provisioned on first use.
    #[must_use]
    pub fn with_auto_provision(mut self, enabled: bool) -> Self {
        self.auto_provision = enabled;
        self
    }

    /// Keep sessions in Redis instead of the encrypted cookie.
    #[must_use]
    pub fn with_session_redis(mut self, url: Option<String>) -> Self {
        self.session_redis_url = url;
        self
    }
}
