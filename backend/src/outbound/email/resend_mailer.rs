//! Reqwest-backed Resend adapter.
//!
//! Owns transport details only: request serialisation, bearer auth,
//! timeout and HTTP error mapping. One attempt per notice.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use zeroize::Zeroizing;

use super::template;
use crate::domain::WinnerNotice;
use crate::domain::ports::{WinnerMailer, WinnerMailerError};

/// Resend's send-email endpoint.
pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const DEFAULT_FROM: &str = "Done For You Pros Winner <winner@amazingworldmedia.com>";

/// Sender identity and credentials for Resend requests.
pub struct ResendIdentity {
    /// API key sent as a bearer token.
    pub api_key: Zeroizing<String>,
    /// `From` header, e.g. `Name <address>`.
    pub from: String,
}

impl ResendIdentity {
    /// Identity with the default sender.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.into()),
            from: DEFAULT_FROM.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Winner mailer that posts to one Resend endpoint.
pub struct ResendMailer {
    client: Client,
    endpoint: Url,
    identity: ResendIdentity,
}

impl ResendMailer {
    /// Build a mailer using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: ResendIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }
}

#[async_trait]
impl WinnerMailer for ResendMailer {
    async fn send(&self, notice: &WinnerNotice) -> Result<(), WinnerMailerError> {
        let payload = build_request(&self.identity.from, notice);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.identity.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "winner email accepted by provider");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn build_request<'a>(from: &'a str, notice: &'a WinnerNotice) -> SendEmailRequest<'a> {
    SendEmailRequest {
        from,
        to: [notice.user_email.as_ref()],
        subject: template::subject(notice),
        html: template::render(notice),
    }
}

fn map_transport_error(error: reqwest::Error) -> WinnerMailerError {
    WinnerMailerError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WinnerMailerError {
    WinnerMailerError::rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
