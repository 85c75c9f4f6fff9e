use crate::domain::entities::alert::Alert;
use crate::domain::entities::deployment::DeploymentPayload;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::report::CheckResults;
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::health_status::HealthStatus;
use crate::domain::value_objects::severity::Severity;

use super::Rule;

pub struct DeploymentDownRule;

impl Rule for DeploymentDownRule {
    fn name(&self) -> &'static str {
        "deployment_down"
    }

    fn evaluate(&self, checks: &CheckResults) -> Vec<Alert> {
        down_alert(&checks.deployment).into_iter().collect()
    }
}

/// Critical alert for a deployment the check found down.
#[must_use]
pub fn down_alert(envelope: &CheckEnvelope<DeploymentPayload>) -> Option<Alert> {
    let payload = envelope.determined()?;
    if payload.status != HealthStatus::Down {
        return None;
    }

    let mut alert = Alert::new(
        Severity::Critical,
        CheckSource::Deployment,
        format!("Deployment of {} is down", payload.service_name),
    )
    .with_action_url(payload.dashboard_url.clone());

    if let Some(latest) = &payload.latest {
        alert = alert.with_detail(format!(
            "Latest deployment {} is {}",
            latest.id, latest.state
        ));
    }
    Some(alert)
}
