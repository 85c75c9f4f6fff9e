use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::CheckResults;
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::severity::Severity;

use super::Rule;

const MAX_LISTED_TARGETS: usize = 10;

pub struct SilentTargetsRule;

impl Rule for SilentTargetsRule {
    fn name(&self) -> &'static str {
        "silent_targets"
    }

    fn evaluate(&self, checks: &CheckResults) -> Vec<Alert> {
        let Some(payload) = checks.datastore.determined() else {
            return vec![];
        };
        if payload.silent_targets.is_empty() {
            return vec![];
        }

        let mut names: Vec<String> = payload
            .silent_targets
            .iter()
            .take(MAX_LISTED_TARGETS)
            .map(|t| t.name.clone())
            .collect();
        let hidden = payload.silent_targets.len().saturating_sub(names.len());
        if hidden > 0 {
            names.push(format!("and {hidden} more"));
        }

        vec![
            Alert::new(
                Severity::Info,
                CheckSource::Datastore,
                format!(
                    "{} target(s) silent for {}+ days",
                    payload.silent_targets.len(),
                    payload.silent_threshold_days
                ),
            )
            .with_detail(names.join(", ")),
        ]
    }
}
