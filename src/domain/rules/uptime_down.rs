use crate::domain::entities::alert::Alert;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::report::CheckResults;
use crate::domain::entities::uptime::UptimePayload;
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::severity::Severity;

use super::Rule;

pub struct UptimeDownRule;

impl Rule for UptimeDownRule {
    fn name(&self) -> &'static str {
        "uptime_down"
    }

    fn evaluate(&self, checks: &CheckResults) -> Vec<Alert> {
        down_alert(&checks.uptime).into_iter().collect()
    }
}

/// One critical alert naming every endpoint the check found down.
#[must_use]
pub fn down_alert(envelope: &CheckEnvelope<UptimePayload>) -> Option<Alert> {
    let payload = envelope.determined()?;
    let down = payload.down_endpoints();
    if down.is_empty() {
        return None;
    }

    let names: Vec<&str> = down.iter().map(|e| e.name.as_str()).collect();
    let detail = down
        .iter()
        .map(|e| {
            let cause = e.error.as_deref().unwrap_or("no response");
            format!("{} ({}): {cause}", e.name, e.url)
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(
        Alert::new(
            Severity::Critical,
            CheckSource::Uptime,
            format!("Down: {}", names.join(", ")),
        )
        .with_detail(detail),
    )
}
