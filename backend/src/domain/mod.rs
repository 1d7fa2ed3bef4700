//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed tenant, credential, lead, setting and
//! game model plus the services that implement the driving ports. Nothing in
//! here knows about HTTP or SQL; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error envelope.
//! - Tenant, AdminUser, Lead, Setting — stored entities and their
//!   validated field types.
//! - GameLayout / WinRule — the data-driven scratch game.
//! - `*Service` — implementations of the driving ports in [`ports`].

pub mod ports;

mod admin;
mod admin_auth_service;
mod auth;
mod contact;
pub mod error;
mod lead;
mod lead_admin_service;
mod password;
mod registration_service;
pub mod scratch_game;
mod setting;
mod settings_service;
mod tenant;
mod tenant_directory_service;
mod trace_id;
pub mod validation;
mod winner_notice;
mod winner_notification_service;

pub use self::admin::{AdminId, AdminRole, AdminUser, AdminUsername, AdminUsernameError};
pub use self::admin_auth_service::AdminAuthService;
pub use self::auth::{CredentialUpdate, LoginCredentials, PASSWORD_MIN};
pub use self::contact::{
    ContactValidationError, EMAIL_MAX, EmailAddress, PHONE_MAX, PHONE_MIN, PhoneNumber,
    is_email_shaped,
};
pub use self::error::{DomainError, Error, ErrorCode};
pub use self::lead::{Lead, LeadId, LeadName, LeadSummary, NAME_MAX, NAME_MIN, NewLead};
pub use self::lead_admin_service::LeadAdminService;
pub use self::password::{
    GENERATED_SUFFIX_LEN, PasswordError, PasswordHash, generate_admin_password,
};
pub use self::registration_service::RegistrationService;
pub use self::scratch_game::{GameError, GameLayout, Outcome, Prize, PrizeId, ScratchCard, WinRule};
pub use self::setting::{
    DEFAULT_TOGGLE_VALUE, SETTING_DESCRIPTION_MAX, SETTING_VALUE_MAX, Setting, SettingKey,
    SettingUpdate, WellKnownSetting,
};
pub use self::settings_service::SettingsService;
pub use self::tenant::{
    SLUG_MAX, TENANT_NAME_MAX, Tenant, TenantId, TenantName, TenantSlug, TenantValidationError,
};
pub use self::tenant_directory_service::TenantDirectoryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldIssue, FieldIssues};
pub use self::winner_notice::WinnerNotice;
pub use self::winner_notification_service::WinnerNotificationService;
