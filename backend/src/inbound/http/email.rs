//! Winner and test email endpoints.
//!
//! Delivery is reported in the body: `200 {"success":true}` when the
//! provider accepted the message, `500 {"success":false}` otherwise. Input
//! problems still use the regular error envelope.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::Delivery;
use crate::domain::{EmailAddress, Error, WinnerNotice};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

/// Winner details posted by the game page.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinnerEmailRequest {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub prize_name: String,
    #[serde(default)]
    #[schema(example = "$591")]
    pub prize_value: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Recipient of a test email.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TestEmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Delivery report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailResult {
    pub message: String,
    pub success: bool,
}

fn report(delivery: Delivery, sent: &str, failed: &str) -> HttpResponse {
    if delivery.is_sent() {
        HttpResponse::Ok().json(EmailResult {
            message: sent.to_owned(),
            success: true,
        })
    } else {
        HttpResponse::InternalServerError().json(EmailResult {
            message: failed.to_owned(),
            success: false,
        })
    }
}

/// Email the winner their prize details.
#[utoipa::path(
    post,
    path = "/api/email/winner",
    request_body = WinnerEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailResult),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Provider failure", body = EmailResult)
    ),
    tags = ["email"],
    operation_id = "sendWinnerEmail"
)]
#[post("/email/winner")]
pub async fn send_winner_email(
    state: web::Data<HttpState>,
    payload: web::Json<WinnerEmailRequest>,
) -> ApiResult<HttpResponse> {
    let WinnerEmailRequest {
        user_email,
        user_name,
        prize_name,
        prize_value,
        phone_number,
    } = payload.into_inner();
    let notice = WinnerNotice::try_from_parts(
        &user_email,
        &user_name,
        &prize_name,
        &prize_value,
        &phone_number,
    )?;
    let delivery = state.notifications.notify_winner(&notice).await;
    Ok(report(
        delivery,
        "Winner email sent successfully",
        "Failed to send winner email",
    ))
}

/// Send the winner template with canned prize data to the supplied address.
#[utoipa::path(
    post,
    path = "/api/email/test",
    request_body = TestEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailResult),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Provider failure", body = EmailResult)
    ),
    tags = ["email"],
    operation_id = "sendTestEmail"
)]
#[post("/email/test")]
pub async fn send_test_email(
    state: web::Data<HttpState>,
    payload: web::Json<TestEmailRequest>,
) -> ApiResult<HttpResponse> {
    let recipient = EmailAddress::new(&payload.email)
        .map_err(|err| field_error(err.into_issue("email")))?;
    tracing::info!("test email requested");
    let delivery = state.notifications.send_test(recipient).await;
    Ok(report(
        delivery,
        "Test email sent successfully",
        "Failed to send test email",
    ))
}
