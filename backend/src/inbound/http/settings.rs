//! Per-tenant settings.
//!
//! The public read never provisions a tenant and answers `{"value":"true"}`
//! for anything it cannot find, so landing pages keep their gated defaults.

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DEFAULT_TOGGLE_VALUE, Error, Setting, SettingUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::admin_tenant;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, parse_setting_key, parse_slug};

/// Stored setting.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
    pub id: i32,
    pub tenant_id: i32,
    #[schema(example = "video_requirement_enabled")]
    pub key: String,
    #[schema(example = "true")]
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Setting> for SettingDto {
    fn from(setting: Setting) -> Self {
        Self {
            id: setting.id,
            tenant_id: setting.tenant_id.get(),
            key: setting.key.to_string(),
            value: setting.value,
            description: setting.description,
            updated_at: setting.updated_at,
        }
    }
}

/// Public answer: the stored row or the enabled default.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PublicSetting {
    Stored(SettingDto),
    Default {
        /// Always `"true"`.
        value: String,
    },
}

/// Upsert body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutSettingRequest {
    #[serde(default)]
    #[schema(example = "false")]
    pub value: String,
    pub description: Option<String>,
}

/// Upsert confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PutSettingResponse {
    pub message: String,
    pub setting: SettingDto,
}

/// Read one setting without authentication.
#[utoipa::path(
    get,
    path = "/api/{slug}/settings/{key}",
    params(
        ("slug" = String, Path, description = "Tenant slug"),
        ("key" = String, Path, description = "Setting key")
    ),
    responses(
        (status = 200, description = "Stored setting or the enabled default", body = PublicSetting),
        (status = 400, description = "Invalid slug or key", body = Error)
    ),
    tags = ["settings"],
    operation_id = "getPublicSetting"
)]
#[get("/{slug}/settings/{key}")]
pub async fn public_setting(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PublicSetting>> {
    let (slug, key) = path.into_inner();
    let slug = parse_slug(&slug)?;
    let key = parse_setting_key(&key)?;
    let stored = match state.tenants.lookup(&slug).await? {
        Some(tenant) => state.settings.find(tenant.id, &key).await?,
        None => None,
    };
    Ok(web::Json(stored.map_or_else(
        || PublicSetting::Default {
            value: DEFAULT_TOGGLE_VALUE.to_owned(),
        },
        |setting| PublicSetting::Stored(setting.into()),
    )))
}

/// Every setting of the tenant, ordered by key.
#[utoipa::path(
    get,
    path = "/api/{slug}/admin/settings",
    params(("slug" = String, Path, description = "Tenant slug")),
    responses(
        (status = 200, description = "Settings", body = [SettingDto]),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant not found", body = Error)
    ),
    tags = ["settings"],
    operation_id = "listSettings"
)]
#[get("/{slug}/admin/settings")]
pub async fn list_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<web::Json<Vec<SettingDto>>> {
    let tenant = admin_tenant(&state, &session, &slug).await?;
    let settings = state.settings.list(tenant.id).await?;
    Ok(web::Json(settings.into_iter().map(SettingDto::from).collect()))
}

/// Create or update one setting.
#[utoipa::path(
    put,
    path = "/api/{slug}/admin/settings/{key}",
    params(
        ("slug" = String, Path, description = "Tenant slug"),
        ("key" = String, Path, description = "Setting key")
    ),
    request_body = PutSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = PutSettingResponse),
        (status = 400, description = "Invalid key or value", body = Error),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant not found", body = Error)
    ),
    tags = ["settings"],
    operation_id = "putSetting"
)]
#[put("/{slug}/admin/settings/{key}")]
pub async fn put_setting(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<PutSettingRequest>,
) -> ApiResult<web::Json<PutSettingResponse>> {
    let (slug, key) = path.into_inner();
    let tenant = admin_tenant(&state, &session, &slug).await?;
    let key = parse_setting_key(&key)?;
    let PutSettingRequest { value, description } = payload.into_inner();
    let update = SettingUpdate::new(key, &value, description.as_deref()).map_err(field_error)?;
    let setting = state.settings.put(tenant.id, update).await?;
    tracing::info!(tenant = %tenant.slug, key = %setting.key, "setting updated");
    Ok(web::Json(PutSettingResponse {
        message: "Setting updated successfully".to_owned(),
        setting: setting.into(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{SettingKey, TenantId};
    use crate::inbound::http::test_utils::{MockPorts, admin_of, login_cookie, tenant, test_app};

    fn setting(tenant_id: TenantId, key: &str, value: &str) -> Setting {
        Setting {
            id: 5,
            tenant_id,
            key: SettingKey::new(key).expect("key"),
            value: value.to_owned(),
            description: Some("Require users to watch video".to_owned()),
            updated_at: Utc::now(),
        }
    }

    async fn get_json(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn public_read_defaults_to_enabled_for_unknown_tenants() {
        let mut ports = MockPorts::default();
        ports.tenants.expect_lookup().returning(|_| Ok(None));
        let (status, body) =
            get_json(ports, "/api/newcomer/settings/video_requirement_enabled").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": "true" }));
    }

    #[actix_web::test]
    async fn public_read_defaults_to_enabled_for_missing_rows() {
        let mut ports = MockPorts::default();
        ports.known_tenant(tenant(1, "acme"));
        ports.settings.expect_find().returning(|_, _| Ok(None));
        let (_, body) = get_json(ports, "/api/acme/settings/duplicate_phone_check").await;
        assert_eq!(body, json!({ "value": "true" }));
    }

    #[actix_web::test]
    async fn public_read_returns_the_stored_row() {
        let mut ports = MockPorts::default();
        ports.known_tenant(tenant(1, "acme"));
        ports
            .settings
            .expect_find()
            .returning(|tenant_id, key| Ok(Some(setting(tenant_id, key.as_ref(), "false"))));
        let (status, body) = get_json(ports, "/api/acme/settings/video_requirement_enabled").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "false");
        assert_eq!(body["tenantId"], 1);
        assert_eq!(body["key"], "video_requirement_enabled");
    }

    #[actix_web::test]
    async fn admin_list_requires_a_session() {
        let (status, body) = get_json(MockPorts::default(), "/api/acme/admin/settings").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authentication required");
    }

    #[rstest]
    #[case("acme", StatusCode::OK)]
    #[case("globex", StatusCode::FORBIDDEN)]
    #[case("initech", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn admin_list_is_scoped_to_the_session_tenant(
        #[case] slug: &str,
        #[case] expected: StatusCode,
    ) {
        let acme = tenant(1, "acme");
        let globex = tenant(2, "globex");
        let mut ports = MockPorts::default();
        ports.allow_login(admin_of(&acme));
        ports.tenants.expect_lookup().returning(move |slug| {
            Ok([acme.clone(), globex.clone()]
                .into_iter()
                .find(|tenant| &tenant.slug == slug))
        });
        ports
            .settings
            .expect_list()
            .returning(|tenant_id| Ok(vec![setting(tenant_id, "duplicate_email_check", "true")]));
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/{slug}/admin/settings"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[case("video_requirement_enabled", json!({ "value": "maybe" }), "value")]
    #[case("Bad-Key", json!({ "value": "true" }), "key")]
    #[actix_web::test]
    async fn put_validates_key_and_value(
        #[case] key: &str,
        #[case] body: Value,
        #[case] field: &str,
    ) {
        let acme = tenant(1, "acme");
        let mut ports = MockPorts::default();
        ports.allow_login(admin_of(&acme));
        ports.known_tenant(acme);
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/acme/admin/settings/{key}"))
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["errors"][0]["field"], field);
    }

    #[actix_web::test]
    async fn put_upserts_and_echoes_the_setting() {
        let acme = tenant(1, "acme");
        let mut ports = MockPorts::default();
        ports.allow_login(admin_of(&acme));
        ports.known_tenant(acme);
        ports
            .settings
            .expect_put()
            .withf(|tenant_id, update| {
                *tenant_id == TenantId::new(1)
                    && update.key.as_ref() == "video_requirement_enabled"
                    && update.value == "false"
                    && update.description.is_none()
            })
            .returning(|tenant_id, update| {
                Ok(setting(tenant_id, update.key.as_ref(), &update.value))
            });
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/acme/admin/settings/video_requirement_enabled")
                .cookie(cookie)
                .set_json(json!({ "value": "false" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Setting updated successfully");
        assert_eq!(body["setting"]["value"], "false");
    }
}
