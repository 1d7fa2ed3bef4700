//! Admin lead listing and deletion.
//!
//! ```text
//! GET    /api/acme/admin/registrations
//! GET    /api/acme/admin/registrations/summary
//! DELETE /api/acme/admin/registrations/17
//! POST   /api/acme/admin/registrations/bulk-delete {"ids":[17,18]}
//! ```

use actix_web::{delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Lead, LeadId, LeadSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::admin_tenant;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

use super::MessageResponse;

/// Stored lead as shown in the dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadDto {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub video_watched: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Lead> for LeadDto {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id.get(),
            tenant_id: lead.tenant_id.get(),
            name: lead.name.as_ref().to_owned(),
            phone: lead.phone.to_string(),
            email: lead.email.to_string(),
            video_watched: lead.video_watched,
            created_at: lead.created_at,
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummaryDto {
    pub total: u64,
    pub video_watched: u64,
    pub today: u64,
    pub this_week: u64,
    /// Percentage of leads that watched the video, one decimal.
    #[schema(example = 62.5)]
    pub conversion_rate: f64,
}

impl From<LeadSummary> for LeadSummaryDto {
    fn from(summary: LeadSummary) -> Self {
        Self {
            total: summary.total,
            video_watched: summary.video_watched,
            today: summary.today,
            this_week: summary.this_week,
            conversion_rate: summary.conversion_rate,
        }
    }
}

/// Bulk delete body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i32>,
}

/// Bulk delete result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponse {
    #[schema(example = "2 registrations deleted successfully")]
    pub message: String,
    pub deleted: u64,
}

/// Leads of the tenant, newest first.
#[utoipa::path(
    get,
    path = "/api/{slug}/admin/registrations",
    params(("slug" = String, Path, description = "Tenant slug")),
    responses(
        (status = 200, description = "Leads", body = [LeadDto]),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listRegistrations"
)]
#[get("/{slug}/admin/registrations")]
pub async fn list_registrations(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<web::Json<Vec<LeadDto>>> {
    let tenant = admin_tenant(&state, &session, &slug).await?;
    let leads = state.leads.list(tenant.id).await?;
    Ok(web::Json(leads.into_iter().map(LeadDto::from).collect()))
}

/// Counters for the dashboard header.
#[utoipa::path(
    get,
    path = "/api/{slug}/admin/registrations/summary",
    params(("slug" = String, Path, description = "Tenant slug")),
    responses(
        (status = 200, description = "Summary", body = LeadSummaryDto),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "registrationSummary"
)]
#[get("/{slug}/admin/registrations/summary")]
pub async fn registration_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<web::Json<LeadSummaryDto>> {
    let tenant = admin_tenant(&state, &session, &slug).await?;
    let summary = state.leads.summary(tenant.id).await?;
    Ok(web::Json(summary.into()))
}

/// Delete one lead of the tenant.
#[utoipa::path(
    delete,
    path = "/api/{slug}/admin/registrations/{id}",
    params(
        ("slug" = String, Path, description = "Tenant slug"),
        ("id" = i32, Path, description = "Lead id")
    ),
    responses(
        (status = 200, description = "Lead deleted", body = MessageResponse),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant or registration not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteRegistration"
)]
#[delete("/{slug}/admin/registrations/{id}")]
pub async fn delete_registration(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, i32)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (slug, id) = path.into_inner();
    let tenant = admin_tenant(&state, &session, &slug).await?;
    state.leads.delete(tenant.id, LeadId::new(id)).await?;
    tracing::info!(tenant = %tenant.slug, lead_id = id, "registration deleted");
    Ok(web::Json(MessageResponse::new(
        "Registration deleted successfully",
    )))
}

/// Delete several leads of the tenant in one statement.
#[utoipa::path(
    post,
    path = "/api/{slug}/admin/registrations/bulk-delete",
    params(("slug" = String, Path, description = "Tenant slug")),
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Leads deleted", body = BulkDeleteResponse),
        (status = 400, description = "Too many ids", body = Error),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Not permitted for this tenant", body = Error),
        (status = 404, description = "Tenant not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "bulkDeleteRegistrations"
)]
#[post("/{slug}/admin/registrations/bulk-delete")]
pub async fn bulk_delete_registrations(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
    payload: web::Json<BulkDeleteRequest>,
) -> ApiResult<web::Json<BulkDeleteResponse>> {
    let tenant = admin_tenant(&state, &session, &slug).await?;
    let ids = payload.into_inner().ids.into_iter().map(LeadId::new).collect();
    let deleted = state.leads.bulk_delete(tenant.id, ids).await?;
    tracing::info!(tenant = %tenant.slug, deleted, "registrations bulk deleted");
    Ok(web::Json(BulkDeleteResponse {
        message: format!("{deleted} registrations deleted successfully"),
        deleted,
    }))
}

#[cfg(test)]
#[path = "admin_registrations_tests.rs"]
mod tests;
