//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::GameLayout;
use crate::domain::ports::{
    AdminAuth, LeadAdministration, RegistrationCommand, TenantDirectory, TenantSettings,
    WinnerNotifications,
};

/// Parameter object bundling the driving ports used by the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Slug resolution and provisioning.
    pub tenants: Arc<dyn TenantDirectory>,
    /// Public lead capture.
    pub registrations: Arc<dyn RegistrationCommand>,
    /// Admin login and credential changes.
    pub auth: Arc<dyn AdminAuth>,
    /// Admin lead listing and deletion.
    pub leads: Arc<dyn LeadAdministration>,
    /// Per-tenant toggles.
    pub settings: Arc<dyn TenantSettings>,
    /// Winner and test emails.
    pub notifications: Arc<dyn WinnerNotifications>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tenants: Arc<dyn TenantDirectory>,
    pub registrations: Arc<dyn RegistrationCommand>,
    pub auth: Arc<dyn AdminAuth>,
    pub leads: Arc<dyn LeadAdministration>,
    pub settings: Arc<dyn TenantSettings>,
    pub notifications: Arc<dyn WinnerNotifications>,
    /// Scratch game served to every tenant.
    pub game: Arc<GameLayout>,
}

impl HttpState {
    /// Construct state from the ports bundle and the active game layout.
    ///
    /// # Examples
    /// ```no_run
    /// use scratch_backend::domain::GameLayout;
    /// use scratch_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn build(ports: HttpStatePorts) -> HttpState {
    ///     let layout = GameLayout::launch_default().expect("default layout");
    ///     HttpState::new(ports, layout)
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts, game: GameLayout) -> Self {
        let HttpStatePorts {
            tenants,
            registrations,
            auth,
            leads,
            settings,
            notifications,
        } = ports;
        Self {
            tenants,
            registrations,
            auth,
            leads,
            settings,
            notifications,
            game: Arc::new(game),
        }
    }
}
