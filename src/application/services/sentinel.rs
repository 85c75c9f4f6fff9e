use std::time::Duration;

use super::aggregator::CheckSet;
use super::dispatch::deliver_alert;
use super::guard::guarded;
use crate::domain::entities::deployment::DeploymentPayload;
use crate::domain::entities::uptime::UptimePayload;
use crate::domain::ports::check::HealthCheck;
use crate::domain::ports::notifier::Notifier;
use crate::domain::rules::outage_alerts;
use crate::domain::value_objects::check_source::CheckSource;

/// Result of a single quick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickCycleOutcome {
    pub alerts_raised: usize,
    pub alerts_delivered: usize,
}

/// Frequent, narrow check: uptime and deployment only, alerting on outages
/// and staying silent otherwise.
pub struct Sentinel<'a> {
    uptime: &'a dyn HealthCheck<Payload = UptimePayload>,
    deployment: &'a dyn HealthCheck<Payload = DeploymentPayload>,
    notifier: &'a dyn Notifier,
    check_deadline: Duration,
}

impl<'a> Sentinel<'a> {
    #[must_use]
    pub const fn new(
        checks: CheckSet<'a>,
        notifier: &'a dyn Notifier,
        check_deadline: Duration,
    ) -> Self {
        Self {
            uptime: checks.uptime,
            deployment: checks.deployment,
            notifier,
            check_deadline,
        }
    }

    /// Run uptime and deployment concurrently; deliver each outage alert
    /// individually. Nothing is sent when both are up.
    pub async fn run_quick_cycle(&self) -> QuickCycleOutcome {
        let deadline = self.check_deadline;
        let (uptime, deployment) = tokio::join!(
            guarded(CheckSource::Uptime, deadline, self.uptime.run()),
            guarded(CheckSource::Deployment, deadline, self.deployment.run()),
        );

        let alerts = outage_alerts(&uptime, &deployment);
        if alerts.is_empty() {
            tracing::debug!("Quick cycle OK, no outage");
            return QuickCycleOutcome {
                alerts_raised: 0,
                alerts_delivered: 0,
            };
        }

        tracing::warn!("{} outage alert(s) detected", alerts.len());
        let mut alerts_delivered = 0usize;
        for alert in &alerts {
            if deliver_alert(self.notifier, alert).await {
                alerts_delivered += 1;
            }
        }

        QuickCycleOutcome {
            alerts_raised: alerts.len(),
            alerts_delivered,
        }
    }
}
