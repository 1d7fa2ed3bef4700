//! HTTP inbound adapter exposing REST endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) mod access;
pub mod admin_registrations;
pub mod auth;
pub mod email;
pub mod error;
pub mod game;
pub mod health;
pub mod registrations;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod settings;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Body of responses that only carry a confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
