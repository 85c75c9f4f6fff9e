use std::time::Duration;

use chrono::Utc;

use super::guard::guarded;
use crate::domain::entities::datastore::DatastorePayload;
use crate::domain::entities::deployment::DeploymentPayload;
use crate::domain::entities::inbox::InboxPayload;
use crate::domain::entities::issues::IssueTrackerPayload;
use crate::domain::entities::report::{AggregateReport, CheckResults};
use crate::domain::entities::uptime::UptimePayload;
use crate::domain::ports::check::HealthCheck;
use crate::domain::rules::{AlertClassifier, derive_overall_status};
use crate::domain::value_objects::check_source::CheckSource;

/// The five checks, one per fixed slot.
#[derive(Clone, Copy)]
pub struct CheckSet<'a> {
    pub uptime: &'a dyn HealthCheck<Payload = UptimePayload>,
    pub datastore: &'a dyn HealthCheck<Payload = DatastorePayload>,
    pub issues: &'a dyn HealthCheck<Payload = IssueTrackerPayload>,
    pub deployment: &'a dyn HealthCheck<Payload = DeploymentPayload>,
    pub inbox: &'a dyn HealthCheck<Payload = InboxPayload>,
}

/// Runs the full cycle: every check concurrently, then status derivation
/// and classification.
pub struct Aggregator<'a> {
    checks: CheckSet<'a>,
    classifier: &'a AlertClassifier,
    check_deadline: Duration,
}

impl<'a> Aggregator<'a> {
    #[must_use]
    pub const fn new(
        checks: CheckSet<'a>,
        classifier: &'a AlertClassifier,
        check_deadline: Duration,
    ) -> Self {
        Self {
            checks,
            classifier,
            check_deadline,
        }
    }

    /// Run all five checks and compose the briefing.
    ///
    /// Always returns a report. Checks run concurrently and are all awaited,
    /// so the cycle takes as long as the slowest check, bounded by the
    /// per-check deadline.
    pub async fn run_full_cycle(&self) -> AggregateReport {
        let deadline = self.check_deadline;
        let (uptime, datastore, issues, deployment, inbox) = tokio::join!(
            guarded(CheckSource::Uptime, deadline, self.checks.uptime.run()),
            guarded(CheckSource::Datastore, deadline, self.checks.datastore.run()),
            guarded(CheckSource::IssueTracker, deadline, self.checks.issues.run()),
            guarded(CheckSource::Deployment, deadline, self.checks.deployment.run()),
            guarded(CheckSource::Inbox, deadline, self.checks.inbox.run()),
        );

        let checks = CheckResults {
            uptime,
            datastore,
            issues,
            deployment,
            inbox,
        };
        let overall_status = derive_overall_status(&checks);
        let alerts = self.classifier.classify(&checks);

        tracing::info!(
            status = %overall_status,
            alerts = alerts.len(),
            failed_checks = checks.failed_count(),
            "Full cycle complete"
        );

        AggregateReport {
            generated_at: Utc::now(),
            checks,
            overall_status,
            alerts,
        }
    }
}
