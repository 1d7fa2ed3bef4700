//! Port for the transactional email provider.

use async_trait::async_trait;

use crate::domain::WinnerNotice;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum WinnerMailerError {
        /// No provider is configured.
        Disabled => "winner mailer is not configured"; internal,
        /// The request never reached the provider or timed out.
        Transport { message: String } =>
            "email provider unreachable: {message}"; internal,
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "email provider rejected the message ({status}): {message}"; internal,
    }
}

/// Port for sending one winner email. Delivery is attempted once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WinnerMailer: Send + Sync {
    /// Send `notice` to its recipient.
    async fn send(&self, notice: &WinnerNotice) -> Result<(), WinnerMailerError>;
}
