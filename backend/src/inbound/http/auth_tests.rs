//! Tests for the admin session handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{AdminUsername, ErrorCode};
use crate::inbound::http::test_utils::{MockPorts, admin_of, login_cookie, tenant, test_app};

async fn post_login(ports: MockPorts, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[actix_web::test]
async fn login_returns_the_user_and_a_cookie() {
    let acme = tenant(1, "acme");
    let mut ports = MockPorts::default();
    ports.allow_login(admin_of(&acme));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "admin@acme.com", "password": "acme-abc123" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().any(|c| c.name() == "session"));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(
        body["user"],
        json!({ "id": 10, "username": "admin@acme.com", "role": "admin", "tenantId": 1 })
    );
}

#[rstest]
#[case(json!({ "username": "admin", "password": "pw" }), "username")]
#[case(json!({ "username": "admin@acme.com", "password": "" }), "password")]
#[case(json!({}), "username")]
#[actix_web::test]
async fn malformed_logins_are_rejected_before_lookup(#[case] body: Value, #[case] field: &str) {
    let (status, body) = post_login(MockPorts::default(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "validation_failed");
    assert_eq!(body["details"]["errors"][0]["field"], field);
}

#[actix_web::test]
async fn rejected_logins_surface_the_generic_message() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_login()
        .returning(|_| Err(Error::unauthorized("Invalid username or password")));
    let (status, body) = post_login(
        ports,
        json!({ "username": "nobody@acme.com", "password": "guess" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}

#[actix_web::test]
async fn me_requires_a_session() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/auth/me").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Not authenticated");
}

#[actix_web::test]
async fn me_reloads_the_admin() {
    let acme = tenant(1, "acme");
    let admin = admin_of(&acme);
    let mut ports = MockPorts::default();
    ports.allow_login(admin.clone());
    ports
        .auth
        .expect_current()
        .with(eq(admin.id))
        .returning(move |_| Ok(Some(admin.clone())));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"]["username"], "admin@acme.com");
}

#[actix_web::test]
async fn me_rejects_sessions_of_deleted_admins() {
    let acme = tenant(1, "acme");
    let mut ports = MockPorts::default();
    ports.allow_login(admin_of(&acme));
    ports.auth.expect_current().returning(|_| Ok(None));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_always_succeeds() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/logout")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Logged out successfully");
}

#[actix_web::test]
async fn update_credentials_refreshes_the_session_username() {
    let acme = tenant(1, "acme");
    let admin = admin_of(&acme);
    let mut renamed = admin.clone();
    renamed.username = AdminUsername::new("owner@acme.com").expect("username");
    let mut ports = MockPorts::default();
    ports.allow_login(admin.clone());
    ports
        .auth
        .expect_update_credentials()
        .withf(|_, update| {
            update.username().map(ToString::to_string).as_deref() == Some("owner@acme.com")
                && update.password().is_none()
        })
        .returning(move |_, _| Ok(renamed.clone()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/admin/update-credentials")
            .cookie(cookie)
            .set_json(json!({ "username": "owner@acme.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Credentials updated successfully");
    assert_eq!(body["user"]["username"], "owner@acme.com");
}

#[rstest]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[case(json!({ "password": "short" }), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn update_credentials_validates_the_change(#[case] body: Value, #[case] expected: StatusCode) {
    let acme = tenant(1, "acme");
    let mut ports = MockPorts::default();
    ports.allow_login(admin_of(&acme));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/admin/update-credentials")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn update_credentials_reports_taken_usernames() {
    let acme = tenant(1, "acme");
    let mut ports = MockPorts::default();
    ports.allow_login(admin_of(&acme));
    ports
        .auth
        .expect_update_credentials()
        .returning(|_, _| Err(Error::conflict("Username already taken")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/admin/update-credentials")
            .cookie(cookie)
            .set_json(json!({ "username": "taken@acme.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
fn user_dto_uses_raw_ids() {
    let dto = AdminUserDto::from(&admin_of(&tenant(3, "globex")));
    assert_eq!(dto.id, 30);
    assert_eq!(dto.tenant_id, 3);
    assert_eq!(dto.role, "admin");
    assert_eq!(
        Error::unauthorized("Authentication required").code(),
        ErrorCode::Unauthorized
    );
}
