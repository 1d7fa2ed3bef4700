//! Admin session handlers.
//!
//! ```text
//! POST /api/auth/login {"username":"admin@acme.com","password":"acme-x7Q2pz"}
//! POST /api/auth/logout
//! GET  /api/auth/me
//! PUT  /api/admin/update-credentials {"password":"new-secret"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AdminUser, CredentialUpdate, Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

use super::MessageResponse;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Admin as exposed to the dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: i32,
    #[schema(example = "admin@acme.com")]
    pub username: String,
    #[schema(example = "admin")]
    pub role: String,
    pub tenant_id: i32,
}

impl From<&AdminUser> for AdminUserDto {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.to_string(),
            role: user.role.as_str().to_owned(),
            tenant_id: user.tenant_id.get(),
        }
    }
}

/// Response of login and credential updates.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: AdminUserDto,
}

/// Response of `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: AdminUserDto,
}

/// Credential change; either field may be omitted but not both.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Authenticate an admin and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserMessageResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserMessageResponse>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)?;
    let user = state.auth.login(&credentials).await?;
    session.sign_in(&user)?;
    tracing::info!(admin_id = %user.id, tenant_id = %user.tenant_id, "admin signed in");
    Ok(web::Json(UserMessageResponse {
        message: "Login successful".to_owned(),
        user: AdminUserDto::from(&user),
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.sign_out();
    HttpResponse::Ok().json(MessageResponse::new("Logged out successfully"))
}

/// The signed-in admin.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Signed-in admin", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentAdmin"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserResponse>> {
    let not_authenticated = || Error::unauthorized("Not authenticated");
    let admin = session.admin()?.ok_or_else(not_authenticated)?;
    let Some(user) = state.auth.current(admin.admin_id).await? else {
        session.sign_out();
        return Err(not_authenticated());
    };
    Ok(web::Json(CurrentUserResponse {
        user: AdminUserDto::from(&user),
    }))
}

/// Change the signed-in admin's username and/or password.
#[utoipa::path(
    put,
    path = "/api/admin/update-credentials",
    request_body = UpdateCredentialsRequest,
    responses(
        (status = 200, description = "Credentials updated", body = UserMessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Authentication required", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateCredentials"
)]
#[put("/admin/update-credentials")]
pub async fn update_credentials(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateCredentialsRequest>,
) -> ApiResult<web::Json<UserMessageResponse>> {
    let admin = session.require_admin()?;
    let UpdateCredentialsRequest { username, password } = payload.into_inner();
    let update = CredentialUpdate::try_from_parts(username.as_deref(), password.as_deref())?;
    let user = state.auth.update_credentials(admin.admin_id, update).await?;
    session.refresh_username(&user.username)?;
    tracing::info!(admin_id = %user.id, "admin credentials updated");
    Ok(web::Json(UserMessageResponse {
        message: "Credentials updated successfully".to_owned(),
        user: AdminUserDto::from(&user),
    }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
