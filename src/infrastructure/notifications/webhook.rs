use std::fmt::Write;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use serde_json::{json, Value};

use super::briefing::{check_lines, headline, local_time};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::AggregateReport;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::health_status::HealthStatus;
use crate::domain::value_objects::severity::Severity;

/// Discord rejects embeds with more fields than this.
const DISCORD_MAX_FIELDS: usize = 25;

/// Webhook notification format, auto-detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookFormat {
    Slack,
    Discord,
    Generic,
}

/// Posts briefings and alerts to an HTTP webhook.
///
/// Supports Slack (Block Kit inside colored attachments), Discord (embeds)
/// and a generic JSON body. The format is auto-detected from the webhook
/// URL. Delivery errors are returned to the caller, which decides whether
/// to log them.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
    tz: Tz,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url`, rendering times in `tz`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(url: String, tz: Tz) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self { url, client, tz })
    }

    fn detect_format(&self) -> WebhookFormat {
        // Compare the host exactly; a substring match would accept look-alikes.
        let host = self
            .url
            .split("//")
            .nth(1)
            .and_then(|s| s.split('/').next())
            .and_then(|h| h.split(':').next())
            .unwrap_or("");

        match host {
            "hooks.slack.com" => WebhookFormat::Slack,
            "discord.com" | "discordapp.com" => WebhookFormat::Discord,
            _ => WebhookFormat::Generic,
        }
    }

    async fn post(&self, payload: &Value) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.without_url().to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "webhook returned HTTP {}",
                response.status()
            )))
        }
    }

    // --- Color helpers ---

    const fn status_color_hex(status: HealthStatus) -> &'static str {
        match status {
            HealthStatus::Healthy => "#2ECC71",
            HealthStatus::Degraded => "#E67E22",
            HealthStatus::Down => "#E74C3C",
            HealthStatus::Unknown => "#95A5A6",
        }
    }

    const fn status_color_decimal(status: HealthStatus) -> u32 {
        match status {
            HealthStatus::Healthy => 0x00_2E_CC_71,
            HealthStatus::Degraded => 0x00_E6_7E_22,
            HealthStatus::Down => 0x00_E7_4C_3C,
            HealthStatus::Unknown => 0x00_95_A5_A6,
        }
    }

    const fn severity_color_hex(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => "#3498DB",
            Severity::Warning => "#E67E22",
            Severity::Critical => "#FF0000",
        }
    }

    const fn severity_color_decimal(severity: Severity) -> u32 {
        match severity {
            Severity::Info => 0x00_34_98_DB,
            Severity::Warning => 0x00_E6_7E_22,
            Severity::Critical => 0x00_FF_00_00,
        }
    }

    // --- Briefing formatting ---

    fn format_report(&self, report: &AggregateReport) -> Value {
        match self.detect_format() {
            WebhookFormat::Slack => self.format_report_slack(report),
            WebhookFormat::Discord => self.format_report_discord(report),
            WebhookFormat::Generic => self.format_report_generic(report),
        }
    }

    fn report_body(report: &AggregateReport) -> String {
        let mut text = String::new();
        for line in check_lines(&report.checks) {
            let _ = writeln!(
                text,
                "{} *{}*: {}",
                line.mark(),
                line.source.label(),
                line.summary
            );
        }
        text
    }

    fn format_report_slack(&self, report: &AggregateReport) -> Value {
        let mut blocks = vec![
            json!({
                "type": "header",
                "text": { "type": "plain_text", "text": headline(report) }
            }),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": Self::report_body(report) }
            }),
        ];

        if !report.alerts.is_empty() {
            let mut text = String::from("*Alerts:*");
            for alert in &report.alerts {
                let _ = write!(text, "\n{} {}", alert.severity.emoji(), alert.message);
                if let Some(url) = &alert.action_url {
                    let _ = write!(text, " (<{url}|open>)");
                }
            }
            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": text }
            }));
        }

        blocks.push(json!({
            "type": "context",
            "elements": [{
                "type": "mrkdwn",
                "text": format!("Generated {}", local_time(report.generated_at, self.tz))
            }]
        }));

        json!({
            "attachments": [{
                "color": Self::status_color_hex(report.overall_status),
                "blocks": blocks
            }]
        })
    }

    fn format_report_discord(&self, report: &AggregateReport) -> Value {
        let fields: Vec<Value> = report
            .alerts
            .iter()
            .take(DISCORD_MAX_FIELDS)
            .map(|alert| {
                let mut value = alert.detail.clone().unwrap_or_default();
                if let Some(url) = &alert.action_url {
                    let _ = write!(value, "\n{url}");
                }
                if value.trim().is_empty() {
                    value = alert.source.label().to_string();
                }
                json!({
                    "name": format!("{} {}", alert.severity.emoji(), alert.message),
                    "value": value,
                    "inline": false
                })
            })
            .collect();

        json!({
            "username": "opswatch",
            "embeds": [{
                "title": headline(report),
                "description": Self::report_body(report).replace('*', "**"),
                "color": Self::status_color_decimal(report.overall_status),
                "fields": fields,
                "footer": { "text": local_time(report.generated_at, self.tz) },
                "timestamp": report.generated_at.to_rfc3339()
            }]
        })
    }

    fn format_report_generic(&self, report: &AggregateReport) -> Value {
        json!({
            "source": "opswatch",
            "type": "briefing",
            "overall_status": report.overall_status,
            "generated_at": report.generated_at.to_rfc3339(),
            "generated_at_local": local_time(report.generated_at, self.tz),
            "checks": check_lines(&report.checks).iter().map(|l| json!({
                "source": l.source,
                "status": l.status,
                "failed": l.failed,
                "summary": &l.summary
            })).collect::<Vec<_>>(),
            "alerts": &report.alerts
        })
    }

    // --- Alert formatting ---

    fn format_alert(&self, alert: &Alert) -> Value {
        match self.detect_format() {
            WebhookFormat::Slack => Self::format_alert_slack(alert),
            WebhookFormat::Discord => Self::format_alert_discord(alert),
            WebhookFormat::Generic => self.format_alert_generic(alert),
        }
    }

    fn format_alert_slack(alert: &Alert) -> Value {
        let mut text = alert.detail.clone().unwrap_or_default();
        if let Some(url) = &alert.action_url {
            let _ = write!(text, "\n<{url}|Open dashboard>");
        }

        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("{} {}", alert.severity.emoji(), alert.message)
                }
            }),
            json!({
                "type": "section",
                "fields": [
                    { "type": "mrkdwn", "text": format!("*Severity:*\n{}", alert.severity) },
                    { "type": "mrkdwn", "text": format!("*Source:*\n{}", alert.source.label()) }
                ]
            }),
        ];
        if !text.trim().is_empty() {
            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": text }
            }));
        }

        json!({
            "attachments": [{
                "color": Self::severity_color_hex(alert.severity),
                "blocks": blocks
            }]
        })
    }

    fn format_alert_discord(alert: &Alert) -> Value {
        let mut embed = json!({
            "title": format!("{} {}", alert.severity.emoji(), alert.message),
            "color": Self::severity_color_decimal(alert.severity),
            "fields": [
                { "name": "Severity", "value": alert.severity.to_string(), "inline": true },
                { "name": "Source", "value": alert.source.label(), "inline": true }
            ],
            "timestamp": Utc::now().to_rfc3339()
        });
        if let Some(detail) = &alert.detail {
            embed["description"] = json!(detail);
        }
        if let Some(url) = &alert.action_url {
            embed["url"] = json!(url);
        }

        json!({
            "username": "opswatch",
            "embeds": [embed]
        })
    }

    fn format_alert_generic(&self, alert: &Alert) -> Value {
        json!({
            "source": "opswatch",
            "type": "alert",
            "severity": alert.severity,
            "check": alert.source,
            "message": &alert.message,
            "detail": &alert.detail,
            "action_url": &alert.action_url,
            "sent_at_local": local_time(Utc::now(), self.tz)
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError> {
        self.post(&self.format_report(report)).await
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.post(&self.format_alert(alert)).await
    }
}
