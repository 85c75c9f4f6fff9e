pub mod deployment_down;
pub mod new_issues;
pub mod silent_targets;
pub mod status;
pub mod uptime_down;

use crate::domain::entities::alert::Alert;
use crate::domain::entities::deployment::DeploymentPayload;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::report::CheckResults;
use crate::domain::entities::uptime::UptimePayload;
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::severity::Severity;

pub use status::derive_overall_status;

/// A deterministic rule over one cycle's check results.
/// Rules are pure functions: results in, alerts out. No I/O.
pub trait Rule: Send + Sync {
    /// Returns the unique name of this rule
    fn name(&self) -> &'static str;

    fn evaluate(&self, checks: &CheckResults) -> Vec<Alert>;
}

/// Returns the full-cycle rules, in evaluation order
#[must_use]
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(uptime_down::UptimeDownRule),
        Box::new(deployment_down::DeploymentDownRule),
        Box::new(new_issues::NewIssuesRule),
        Box::new(silent_targets::SilentTargetsRule),
    ]
}

/// Maps a cycle's check results to alerts.
///
/// Every rule is applied independently. A failed check is reported inline in
/// the briefing and does not, by itself, raise an alert here.
pub struct AlertClassifier {
    rules: Vec<Box<dyn Rule>>,
}

impl AlertClassifier {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Runs all rules, returning alerts sorted by severity (critical first).
    /// The sort is stable, so rule order breaks ties.
    #[must_use]
    pub fn classify(&self, checks: &CheckResults) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(checks))
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }
}

impl Default for AlertClassifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

/// Down-only classification for the quick path.
///
/// A check that could not run raises a warning: an unverified target is not
/// treated as healthy.
#[must_use]
pub fn outage_alerts(
    uptime: &CheckEnvelope<UptimePayload>,
    deployment: &CheckEnvelope<DeploymentPayload>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    match uptime.failure_reason() {
        Some(reason) => alerts.push(unverified_alert(CheckSource::Uptime, reason)),
        None => alerts.extend(uptime_down::down_alert(uptime)),
    }

    match deployment.failure_reason() {
        Some(reason) => alerts.push(unverified_alert(CheckSource::Deployment, reason)),
        None => alerts.extend(deployment_down::down_alert(deployment)),
    }

    alerts
}

fn unverified_alert(source: CheckSource, reason: &str) -> Alert {
    Alert::new(
        Severity::Warning,
        source,
        format!("Could not verify {}", source.label().to_lowercase()),
    )
    .with_detail(reason)
}
