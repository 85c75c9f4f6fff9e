use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::report::{AggregateReport, CheckResults};
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::health_status::HealthStatus;

const FAILED_MARK: &str = "\u{26a0}\u{fe0f}";
const INFO_MARK: &str = "\u{2022}";

/// One rendered row of a briefing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLine {
    pub source: CheckSource,
    /// Health of the target, when the check determines one.
    pub status: Option<HealthStatus>,
    pub failed: bool,
    pub summary: String,
}

impl CheckLine {
    #[must_use]
    pub fn mark(&self) -> &str {
        if self.failed {
            FAILED_MARK
        } else {
            self.status.as_ref().map_or(INFO_MARK, HealthStatus::emoji)
        }
    }
}

/// Timestamp in the reporting timezone, e.g. `2026-03-10 08:00 CET`.
#[must_use]
pub fn local_time(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string()
}

#[must_use]
pub fn headline(report: &AggregateReport) -> String {
    format!(
        "{} Daily briefing: {}",
        report.overall_status.emoji(),
        report.overall_status.to_string().to_uppercase()
    )
}

/// One line per check, in fixed order. Failed checks show their reason
/// instead of a summary.
#[must_use]
pub fn check_lines(checks: &CheckResults) -> Vec<CheckLine> {
    vec![
        line(&checks.uptime, |p| {
            let parts: Vec<String> = p
                .endpoints
                .iter()
                .map(|e| match (e.http_status, e.response_time_ms) {
                    (Some(code), Some(ms)) => format!("{} {} ({} ms)", e.name, code, ms),
                    _ => format!("{} {}", e.name, e.status),
                })
                .collect();
            (Some(p.status()), parts.join(", "))
        }),
        line(&checks.datastore, |p| {
            let mut summary = p.latency_ms.map_or_else(
                || p.status.to_string(),
                |ms| format!("{} ({ms} ms)", p.status),
            );
            if p.status != HealthStatus::Down {
                summary.push_str(&format!(
                    ", {}/{} active in 24h, {} silent",
                    p.active_last_24h,
                    p.total_targets,
                    p.silent_targets.len()
                ));
            }
            (Some(p.status), summary)
        }),
        line(&checks.issues, |p| {
            (
                None,
                format!("{} new in 24h, {} unresolved", p.new_issues_24h, p.unresolved),
            )
        }),
        line(&checks.deployment, |p| {
            let state = p.latest.as_ref().map_or("no deployments", |d| d.state.as_str());
            (Some(p.status), format!("{}: {state}", p.service_name))
        }),
        line(&checks.inbox, |p| (None, format!("{} unread", p.unread))),
    ]
}

fn line<P>(
    envelope: &CheckEnvelope<P>,
    describe: impl FnOnce(&P) -> (Option<HealthStatus>, String),
) -> CheckLine {
    match envelope.failure_reason() {
        Some(reason) => CheckLine {
            source: envelope.source(),
            status: None,
            failed: true,
            summary: format!("check failed: {reason}"),
        },
        None => {
            let (status, summary) = describe(envelope.payload());
            CheckLine {
                source: envelope.source(),
                status,
                failed: false,
                summary,
            }
        }
    }
}
