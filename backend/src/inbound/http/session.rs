//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers only deal with signing an admin in or
//! out and reading back who is signed in. The cookie holds the admin id, the
//! admin's tenant id and the username shown in the dashboard.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AdminId, AdminUser, AdminUsername, Error, Tenant, TenantId};

pub(crate) const ADMIN_ID_KEY: &str = "admin_id";
pub(crate) const TENANT_ID_KEY: &str = "tenant_id";
pub(crate) const USERNAME_KEY: &str = "username";

/// Admin identity recovered from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAdmin {
    /// Signed-in admin.
    pub admin_id: AdminId,
    /// Tenant the admin manages.
    pub tenant_id: TenantId,
    /// Username at sign-in or last credential change.
    pub username: String,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn write_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

fn read_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `admin`, rotating the session id.
    pub fn sign_in(&self, admin: &AdminUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_ID_KEY, admin.id.get())
            .map_err(write_error)?;
        self.0
            .insert(TENANT_ID_KEY, admin.tenant_id.get())
            .map_err(write_error)?;
        self.refresh_username(&admin.username)
    }

    /// Replace the stored username after a credential change.
    pub fn refresh_username(&self, username: &AdminUsername) -> Result<(), Error> {
        self.0
            .insert(USERNAME_KEY, username.as_ref())
            .map_err(write_error)
    }

    /// Drop every session entry and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }

    /// The signed-in admin, if any.
    ///
    /// Partially populated sessions are treated as anonymous.
    pub fn admin(&self) -> Result<Option<SessionAdmin>, Error> {
        let admin_id = self.0.get::<i32>(ADMIN_ID_KEY).map_err(read_error)?;
        let tenant_id = self.0.get::<i32>(TENANT_ID_KEY).map_err(read_error)?;
        let username = self.0.get::<String>(USERNAME_KEY).map_err(read_error)?;
        match (admin_id, tenant_id, username) {
            (Some(admin_id), Some(tenant_id), Some(username)) => Ok(Some(SessionAdmin {
                admin_id: AdminId::new(admin_id),
                tenant_id: TenantId::new(tenant_id),
                username,
            })),
            (None, None, None) => Ok(None),
            _ => {
                tracing::warn!("incomplete admin session, treating as anonymous");
                Ok(None)
            }
        }
    }

    /// Require a signed-in admin or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<SessionAdmin, Error> {
        self.admin()?
            .ok_or_else(|| Error::unauthorized("Authentication required"))
    }

    /// Require a signed-in admin of `tenant`: `401` without a session, `403`
    /// for another tenant's admin.
    pub fn require_tenant_admin(&self, tenant: &Tenant) -> Result<SessionAdmin, Error> {
        let admin = self.require_admin()?;
        if admin.tenant_id == tenant.id {
            Ok(admin)
        } else {
            tracing::debug!(
                admin_id = %admin.admin_id,
                tenant = %tenant.slug,
                "admin denied access to foreign tenant"
            );
            Err(Error::forbidden("Not permitted for this tenant"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
