//! Public lead capture.
//!
//! ```text
//! POST /api/acme/register {"name":"Jo Lee","phone":"6198712110","email":"jo@example.com","videoWatched":true}
//! GET  /api/acme/stats
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewLead};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::public_tenant;
use crate::inbound::http::state::HttpState;

/// Registration form body. Missing fields are reported by validation rather
/// than as malformed JSON.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Jo Lee")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "6198712110")]
    pub phone: String,
    #[serde(default)]
    #[schema(example = "jo@example.com")]
    pub email: String,
    #[serde(default)]
    pub video_watched: bool,
}

/// Confirmation returned to the form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = "Registration successful!")]
    pub message: String,
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Public counter shown on the landing page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub registration_count: u64,
}

/// Capture a lead for the tenant named by `slug`.
#[utoipa::path(
    post,
    path = "/api/{slug}/register",
    params(("slug" = String, Path, description = "Tenant slug")),
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Lead stored", body = RegisterResponse),
        (status = 400, description = "Invalid or duplicate registration", body = Error),
        (status = 404, description = "Unknown tenant", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "register"
)]
#[post("/{slug}/register")]
pub async fn register(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let RegisterRequest {
        name,
        phone,
        email,
        video_watched,
    } = payload.into_inner();
    let new_lead = NewLead::try_from_parts(&name, &phone, &email, video_watched)?;
    let tenant = public_tenant(&state, &slug).await?;
    let lead = state.registrations.register(tenant.id, new_lead).await?;
    Ok(web::Json(RegisterResponse {
        message: "Registration successful!".to_owned(),
        id: lead.id.get(),
        name: lead.name.as_ref().to_owned(),
        email: lead.email.to_string(),
        phone: lead.phone.to_string(),
    }))
}

/// Number of leads captured for the tenant.
#[utoipa::path(
    get,
    path = "/api/{slug}/stats",
    params(("slug" = String, Path, description = "Tenant slug")),
    responses(
        (status = 200, description = "Lead count", body = StatsResponse),
        (status = 404, description = "Unknown tenant", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "registrationStats"
)]
#[get("/{slug}/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<StatsResponse>> {
    let tenant = public_tenant(&state, &slug).await?;
    let registration_count = state.registrations.registration_count(tenant.id).await?;
    Ok(web::Json(StatsResponse { registration_count }))
}
