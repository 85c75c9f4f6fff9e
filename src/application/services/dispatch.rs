use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::AggregateReport;
use crate::domain::ports::notifier::Notifier;

/// Best-effort delivery of a briefing. Failures are logged, never retried,
/// and never propagated. Returns whether delivery succeeded.
pub async fn deliver_report(notifier: &dyn Notifier, report: &AggregateReport) -> bool {
    match notifier.send_report(report).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Briefing notification failed: {e}");
            false
        }
    }
}

/// Best-effort delivery of a single alert. Same contract as [`deliver_report`].
pub async fn deliver_alert(notifier: &dyn Notifier, alert: &Alert) -> bool {
    match notifier.send_alert(alert).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(source = %alert.source, "Alert notification failed: {e}");
            false
        }
    }
}
