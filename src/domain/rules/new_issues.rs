use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::CheckResults;
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::severity::Severity;

use super::Rule;

const MAX_LISTED_ISSUES: usize = 3;

pub struct NewIssuesRule;

impl Rule for NewIssuesRule {
    fn name(&self) -> &'static str {
        "new_issues"
    }

    fn evaluate(&self, checks: &CheckResults) -> Vec<Alert> {
        let Some(payload) = checks.issues.determined() else {
            return vec![];
        };
        if payload.new_issues_24h == 0 {
            return vec![];
        }

        let mut alert = Alert::new(
            Severity::Warning,
            CheckSource::IssueTracker,
            format!("{} new issue(s) in the last 24h", payload.new_issues_24h),
        )
        .with_action_url(payload.issues_url.clone());

        let listed: Vec<String> = payload
            .top_issues
            .iter()
            .take(MAX_LISTED_ISSUES)
            .map(|i| format!("{} ({} events)", i.title, i.events))
            .collect();
        if !listed.is_empty() {
            alert = alert.with_detail(listed.join("\n"));
        }

        vec![alert]
    }
}
