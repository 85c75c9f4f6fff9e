use async_trait::async_trait;

use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::AggregateReport;
use crate::domain::ports::notifier::{NotificationError, Notifier};

/// Forwards notifications to every configured gateway.
///
/// Always calls all gateways; returns the first error encountered, if any.
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    #[must_use]
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for CompositeNotifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Notifier for CompositeNotifier {
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.send_report(report).await {
                tracing::debug!("Briefing gateway failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.send_alert(alert).await {
                tracing::debug!("Alert gateway failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
