//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer
//! - **Schemas**: the error envelope and the request/response DTOs
//! - **Security**: session cookie authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::admin_registrations::{
    BulkDeleteRequest, BulkDeleteResponse, LeadDto, LeadSummaryDto,
};
use crate::inbound::http::auth::{
    AdminUserDto, CurrentUserResponse, LoginRequest, UpdateCredentialsRequest,
    UserMessageResponse,
};
use crate::inbound::http::email::{EmailResult, TestEmailRequest, WinnerEmailRequest};
use crate::inbound::http::game::{
    CardDto, EvaluateRequest, EvaluateResponse, GameLayoutDto, OutcomeKind, PrizeDto, WinRuleDto,
};
use crate::inbound::http::registrations::{RegisterRequest, RegisterResponse, StatsResponse};
use crate::inbound::http::settings::{
    PublicSetting, PutSettingRequest, PutSettingResponse, SettingDto,
};

/// Name of the security scheme guarding admin routes.
pub const SESSION_SECURITY_SCHEME: &str = "SessionCookie";

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            SESSION_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Scratch & Win backend API",
        description = "Lead capture, tenant administration and the scratch game for tenant landing pages."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::update_credentials,
        crate::inbound::http::registrations::register,
        crate::inbound::http::registrations::stats,
        crate::inbound::http::settings::public_setting,
        crate::inbound::http::settings::list_settings,
        crate::inbound::http::settings::put_setting,
        crate::inbound::http::admin_registrations::list_registrations,
        crate::inbound::http::admin_registrations::registration_summary,
        crate::inbound::http::admin_registrations::delete_registration,
        crate::inbound::http::admin_registrations::bulk_delete_registrations,
        crate::inbound::http::email::send_winner_email,
        crate::inbound::http::email::send_test_email,
        crate::inbound::http::game::game_layout,
        crate::inbound::http::game::evaluate_card,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        LoginRequest,
        AdminUserDto,
        UserMessageResponse,
        CurrentUserResponse,
        UpdateCredentialsRequest,
        RegisterRequest,
        RegisterResponse,
        StatsResponse,
        SettingDto,
        PublicSetting,
        PutSettingRequest,
        PutSettingResponse,
        LeadDto,
        LeadSummaryDto,
        BulkDeleteRequest,
        BulkDeleteResponse,
        WinnerEmailRequest,
        TestEmailRequest,
        EmailResult,
        PrizeDto,
        CardDto,
        WinRuleDto,
        GameLayoutDto,
        EvaluateRequest,
        OutcomeKind,
        EvaluateResponse,
    )),
    tags(
        (name = "auth", description = "Admin session login and credentials"),
        (name = "registrations", description = "Public lead capture"),
        (name = "settings", description = "Per-tenant feature toggles"),
        (name = "admin", description = "Tenant dashboard operations"),
        (name = "email", description = "Winner notifications"),
        (name = "game", description = "Scratch card layout and evaluation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
