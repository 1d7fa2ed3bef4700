//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`WinnerMailer`]) are implemented by
//! outbound adapters; driving ports are implemented by the domain services
//! and called by the HTTP handlers and the operator CLI.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_auth;
mod admin_repository;
mod lead_administration;
mod lead_repository;
mod registration_command;
mod setting_repository;
mod tenant_directory;
mod tenant_repository;
mod tenant_settings;
mod winner_mailer;
mod winner_notifications;

#[cfg(test)]
pub use admin_auth::MockAdminAuth;
pub use admin_auth::AdminAuth;
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError, CredentialChange};
#[cfg(test)]
pub use lead_administration::MockLeadAdministration;
pub use lead_administration::{BULK_DELETE_MAX, LeadAdministration};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{LeadRepository, LeadRepositoryError};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use setting_repository::MockSettingRepository;
pub use setting_repository::{SettingRepository, SettingRepositoryError};
#[cfg(test)]
pub use tenant_directory::MockTenantDirectory;
pub use tenant_directory::{IssuedCredentials, TenantDirectory};
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{
    ProvisionedTenant, TenantProvisioning, TenantRepository, TenantRepositoryError,
};
#[cfg(test)]
pub use tenant_settings::MockTenantSettings;
pub use tenant_settings::TenantSettings;
#[cfg(test)]
pub use winner_mailer::MockWinnerMailer;
pub use winner_mailer::{WinnerMailer, WinnerMailerError};
#[cfg(test)]
pub use winner_notifications::MockWinnerNotifications;
pub use winner_notifications::{Delivery, WinnerNotifications};
