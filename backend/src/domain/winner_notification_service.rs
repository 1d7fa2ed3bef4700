//! Winner notification service: one synchronous attempt per email, with
//! failures logged here and reported to callers as [`Delivery::Failed`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{Delivery, WinnerMailer, WinnerMailerError, WinnerNotifications};
use crate::domain::{EmailAddress, WinnerNotice};

/// Notification service implementing [`WinnerNotifications`].
#[derive(Clone)]
pub struct WinnerNotificationService<M> {
    mailer: Arc<M>,
}

impl<M> WinnerNotificationService<M> {
    /// Create a service over a mailer.
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }
}

impl<M> WinnerNotificationService<M>
where
    M: WinnerMailer,
{
    async fn deliver(&self, notice: &WinnerNotice) -> Delivery {
        match self.mailer.send(notice).await {
            Ok(()) => {
                info!(prize = %notice.prize_name, "winner email sent");
                Delivery::Sent
            }
            Err(WinnerMailerError::Disabled) => {
                warn!("winner email skipped: no email provider configured");
                Delivery::Failed
            }
            Err(err) => {
                warn!(error = %err, "winner email failed");
                Delivery::Failed
            }
        }
    }
}

#[async_trait]
impl<M> WinnerNotifications for WinnerNotificationService<M>
where
    M: WinnerMailer,
{
    async fn notify_winner(&self, notice: &WinnerNotice) -> Delivery {
        self.deliver(notice).await
    }

    async fn send_test(&self, recipient: EmailAddress) -> Delivery {
        self.deliver(&WinnerNotice::test_for(recipient)).await
    }
}
