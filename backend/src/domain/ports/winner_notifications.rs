//! Driving port for winner emails.

use async_trait::async_trait;

use crate::domain::{EmailAddress, WinnerNotice};

/// Result of one delivery attempt. Failures are logged by the service and
/// reported to the caller without detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The provider accepted the message.
    Sent,
    /// The provider was unavailable, rejected it, or is not configured.
    Failed,
}

impl Delivery {
    /// Whether the message went out.
    #[must_use]
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Domain use-case port for winner notification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WinnerNotifications: Send + Sync {
    /// Email a winner.
    async fn notify_winner(&self, notice: &WinnerNotice) -> Delivery;

    /// Email the canned test notice to `recipient`.
    async fn send_test(&self, recipient: EmailAddress) -> Delivery;
}
