//! Tenant lookup and admin gating shared by the `/{slug}` handlers.

use crate::domain::{Error, Tenant};

use super::session::SessionContext;
use super::state::HttpState;
use super::validation::parse_slug;

/// Resolve the tenant behind a public route, provisioning it when the
/// directory policy allows.
pub(crate) async fn public_tenant(state: &HttpState, raw_slug: &str) -> Result<Tenant, Error> {
    let slug = parse_slug(raw_slug)?;
    state.tenants.resolve(&slug).await
}

/// Look up the tenant behind an admin route and check that the session
/// belongs to one of its admins.
///
/// Anonymous callers get `401` before the slug is even looked at, so the
/// route does not leak which tenants exist.
pub(crate) async fn admin_tenant(
    state: &HttpState,
    session: &SessionContext,
    raw_slug: &str,
) -> Result<Tenant, Error> {
    session.require_admin()?;
    let slug = parse_slug(raw_slug)?;
    let tenant = state
        .tenants
        .lookup(&slug)
        .await?
        .ok_or_else(|| Error::not_found("Tenant not found"))?;
    session.require_tenant_admin(&tenant)?;
    Ok(tenant)
}
