//! Builders for the HTTP state from the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tracing::warn;

use scratch_backend::domain::ports::{
    AdminRepository, LeadRepository, SettingRepository, TenantRepository, WinnerMailer,
    WinnerNotifications,
};
use scratch_backend::domain::{
    AdminAuthService, GameLayout, LeadAdminService, RegistrationService, SettingsService,
    TenantDirectoryService, WinnerNotificationService,
};
use scratch_backend::inbound::http::state::{HttpState, HttpStatePorts};
use scratch_backend::outbound::email::{DisabledMailer, ResendIdentity, ResendMailer};
use scratch_backend::outbound::memory::MemoryStore;
use scratch_backend::outbound::persistence::{
    DieselAdminRepository, DieselLeadRepository, DieselSettingRepository, DieselTenantRepository,
};

use super::ServerConfig;
use super::config::MailerConfig;

/// Repository adapters behind the domain services.
struct Repositories<T, A, L, S> {
    tenants: Arc<T>,
    admins: Arc<A>,
    leads: Arc<L>,
    settings: Arc<S>,
}

impl Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    /// One shared store so provisioning stays atomic across tables.
    fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            tenants: store.clone(),
            admins: store.clone(),
            leads: store.clone(),
            settings: store,
        }
    }
}

/// Wire the domain services over `repos`.
fn build_ports<T, A, L, S>(
    repos: Repositories<T, A, L, S>,
    auto_provision: bool,
    notifications: Arc<dyn WinnerNotifications>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    T: TenantRepository + 'static,
    A: AdminRepository + 'static,
    L: LeadRepository + 'static,
    S: SettingRepository + 'static,
{
    let Repositories {
        tenants,
        admins,
        leads,
        settings,
    } = repos;
    HttpStatePorts {
        tenants: Arc::new(TenantDirectoryService::new(
            tenants,
            admins.clone(),
            auto_provision,
        )),
        registrations: Arc::new(RegistrationService::new(leads.clone(), settings.clone())),
        auth: Arc::new(AdminAuthService::new(admins)),
        leads: Arc::new(LeadAdminService::new(leads, clock)),
        settings: Arc::new(SettingsService::new(settings)),
        notifications,
    }
}

fn notifications_over<M: WinnerMailer + 'static>(mailer: M) -> Arc<dyn WinnerNotifications> {
    Arc::new(WinnerNotificationService::new(Arc::new(mailer)))
}

/// Resend when an API key is configured, otherwise a mailer that fails
/// every send.
///
/// # Errors
/// Returns [`std::io::Error`] when the endpoint is not a URL or the HTTP
/// client cannot be built.
fn build_notifications(config: &MailerConfig) -> std::io::Result<Arc<dyn WinnerNotifications>> {
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("SCRATCH_RESEND_API_KEY unset; winner emails will fail");
        return Ok(notifications_over(DisabledMailer));
    };
    let endpoint = Url::parse(&config.endpoint).map_err(|err| {
        std::io::Error::other(format!("invalid Resend endpoint {}: {err}", config.endpoint))
    })?;
    let identity = ResendIdentity {
        from: config.from.clone(),
        ..ResendIdentity::new(api_key)
    };
    let mailer = ResendMailer::new(endpoint, config.timeout, identity)
        .map_err(|err| std::io::Error::other(format!("build Resend client: {err}")))?;
    Ok(notifications_over(mailer))
}

/// Build the shared HTTP state from configured adapters.
///
/// PostgreSQL repositories are used when a pool is configured; otherwise
/// every port runs on one [`MemoryStore`] and nothing survives a restart.
///
/// # Errors
/// Returns [`std::io::Error`] when the mailer or the game layout cannot be
/// built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let notifications = build_notifications(&config.mailer)?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Repositories {
                tenants: Arc::new(DieselTenantRepository::new(pool.clone())),
                admins: Arc::new(DieselAdminRepository::new(pool.clone())),
                leads: Arc::new(DieselLeadRepository::new(pool.clone())),
                settings: Arc::new(DieselSettingRepository::new(pool.clone())),
            },
            config.auto_provision,
            notifications,
            clock,
        ),
        None => {
            warn!("SCRATCH_DATABASE_URL unset; using the in-memory store");
            build_ports(
                Repositories::in_memory(MemoryStore::with_clock(clock.clone())),
                config.auto_provision,
                notifications,
                clock,
            )
        }
    };
    let game = GameLayout::launch_default()
        .map_err(|err| std::io::Error::other(format!("invalid game layout: {err}")))?;
    Ok(web::Data::new(HttpState::new(ports, game)))
}
