use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::datastore::DatastorePayload;
use super::deployment::DeploymentPayload;
use super::envelope::CheckEnvelope;
use super::inbox::InboxPayload;
use super::issues::IssueTrackerPayload;
use super::uptime::UptimePayload;
use crate::domain::value_objects::health_status::HealthStatus;

/// One envelope per check category, in fixed slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResults {
    pub uptime: CheckEnvelope<UptimePayload>,
    pub datastore: CheckEnvelope<DatastorePayload>,
    pub issues: CheckEnvelope<IssueTrackerPayload>,
    pub deployment: CheckEnvelope<DeploymentPayload>,
    pub inbox: CheckEnvelope<InboxPayload>,
}

impl CheckResults {
    /// Number of checks that could not run to completion.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        [
            self.uptime.ok(),
            self.datastore.ok(),
            self.issues.ok(),
            self.deployment.ok(),
            self.inbox.ok(),
        ]
        .into_iter()
        .filter(|ok| !ok)
        .count()
    }
}

/// The briefing produced by a full cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub generated_at: DateTime<Utc>,
    pub checks: CheckResults,
    pub overall_status: HealthStatus,
    pub alerts: Vec<Alert>,
}
