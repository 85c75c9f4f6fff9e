use std::borrow::Cow;

use async_trait::async_trait;
use chrono_tz::Tz;
use colored::Colorize;

use super::briefing::{check_lines, headline, local_time};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::AggregateReport;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::health_status::HealthStatus;
use crate::domain::value_objects::severity::Severity;

const SEPARATOR_WIDTH: usize = 70;

/// Prints briefings and alerts to stdout.
pub struct TerminalNotifier {
    tz: Tz,
}

impl TerminalNotifier {
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError> {
        let separator = "\u{2550}".repeat(SEPARATOR_WIDTH);

        println!("\n{}", separator.cyan());
        println!("{}", status_badge(report.overall_status, &headline(report)));
        println!(
            "{}",
            local_time(report.generated_at, self.tz).dimmed()
        );
        println!("{}", separator.cyan());

        for line in check_lines(&report.checks) {
            let summary = if line.failed {
                sanitize(&line.summary).yellow().to_string()
            } else {
                sanitize(&line.summary).to_string()
            };
            println!(
                "  {} {:<11} {}",
                line.mark(),
                line.source.label().bold(),
                summary
            );
        }

        if !report.alerts.is_empty() {
            println!("\n{}", "Alerts:".cyan().bold());
            for alert in &report.alerts {
                println!("  {} {}", severity_badge(alert.severity), sanitize(&alert.message));
                if let Some(url) = &alert.action_url {
                    println!("    {}", format!("\u{2192} {}", sanitize(url)).dimmed());
                }
            }
        }

        println!("{}\n", separator.cyan());
        Ok(())
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);

        println!("\n{}", separator.dimmed());
        println!(
            "{} {} {}",
            severity_badge(alert.severity),
            sanitize(&alert.message).bold(),
            format!("[{}]", alert.source.label()).dimmed()
        );
        println!("{}", separator.dimmed());

        if let Some(detail) = &alert.detail {
            println!("{}", sanitize(detail));
        }
        if let Some(url) = &alert.action_url {
            println!("{}", format!("\u{2192} {}", sanitize(url)).dimmed());
        }

        println!("{}\n", separator.dimmed());
        Ok(())
    }
}

/// Strip ANSI escape sequences and C0/C1 control characters from a string,
/// preserving only printable content, newlines, and tabs.
fn sanitize(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
    {
        Cow::Owned(
            s.chars()
                .filter(|&c| !matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[must_use]
fn severity_badge(severity: Severity) -> String {
    let label = format!(" {} {} ", severity.emoji(), severity);
    match severity {
        Severity::Critical => label.on_red().white().bold().to_string(),
        Severity::Warning => label.on_yellow().black().bold().to_string(),
        Severity::Info => label.on_blue().white().to_string(),
    }
}

#[must_use]
fn status_badge(status: HealthStatus, text: &str) -> String {
    let label = format!(" {text} ");
    match status {
        HealthStatus::Healthy => label.on_green().black().bold().to_string(),
        HealthStatus::Degraded => label.on_yellow().black().bold().to_string(),
        HealthStatus::Down => label.on_red().white().bold().to_string(),
        HealthStatus::Unknown => label.on_white().black().to_string(),
    }
}
