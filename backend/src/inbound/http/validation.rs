//! Extractor configuration and path parsing shared by the HTTP handlers.
//!
//! Malformed JSON bodies and path segments become 400 envelopes instead of
//! Actix's plain-text defaults.

use actix_web::{HttpRequest, error::JsonPayloadError, error::PathError, web};
use serde_json::json;

use crate::domain::{
    Error, FieldIssue, FieldIssues, SettingKey, TenantSlug, TenantValidationError,
};

/// Largest accepted JSON body.
pub const JSON_LIMIT: usize = 64 * 1024;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (code, message) = match &err {
        JsonPayloadError::ContentType => ("invalid_content_type", "Expected a JSON body"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ("payload_too_large", "Request body is too large")
        }
        _ => ("invalid_json", "Malformed JSON body"),
    };
    tracing::debug!(error = %err, "rejected JSON payload");
    Error::invalid_request(message)
        .with_details(json!({ "code": code, "reason": err.to_string() }))
        .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Invalid path parameter")
        .with_details(json!({ "code": "invalid_path", "reason": err.to_string() }))
        .into()
}

/// JSON extractor settings for every route.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(json_error)
}

/// Path extractor settings for every route.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

/// Wrap a single field issue in the validation envelope.
pub(crate) fn field_error(issue: FieldIssue) -> Error {
    FieldIssues::from(issue).into()
}

/// Parse the `{slug}` path segment.
pub(crate) fn parse_slug(raw: &str) -> Result<TenantSlug, Error> {
    TenantSlug::new(raw).map_err(|err: TenantValidationError| {
        field_error(FieldIssue::new("slug", "invalid_slug", err.to_string()))
    })
}

/// Parse the `{key}` path segment of the settings routes.
pub(crate) fn parse_setting_key(raw: &str) -> Result<SettingKey, Error> {
    SettingKey::new(raw).map_err(field_error)
}
