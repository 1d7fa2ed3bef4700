//! Mailer used when no provider is configured.

use async_trait::async_trait;

use crate::domain::WinnerNotice;
use crate::domain::ports::{WinnerMailer, WinnerMailerError};

/// Rejects every send with [`WinnerMailerError::Disabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl WinnerMailer for DisabledMailer {
    async fn send(&self, _notice: &WinnerNotice) -> Result<(), WinnerMailerError> {
        Err(WinnerMailerError::disabled())
    }
}
