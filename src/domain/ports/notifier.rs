use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::AggregateReport;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Delivery gateway for briefings and alerts.
///
/// Callers log the returned error and move on; delivery is never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a full-cycle briefing.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the notification fails to send
    /// or the channel is unavailable.
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError>;

    /// Deliver a single alert.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the notification fails to send
    /// or the channel is unavailable.
    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError>;
}
