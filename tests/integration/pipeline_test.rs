#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use opswatch::application::services::{Aggregator, CheckSet, Sentinel};
use opswatch::domain::entities::{
    AggregateReport, Alert, CheckEnvelope, DatastorePayload, DeploymentInfo, DeploymentPayload,
    EndpointStatus, InboxPayload, IssueTrackerPayload, SilentTarget, UptimePayload,
};
use opswatch::domain::ports::{HealthCheck, NotificationError, Notifier};
use opswatch::domain::rules::AlertClassifier;
use opswatch::domain::value_objects::{CheckSource, HealthStatus, Severity};

const DEADLINE: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Port doubles
// ---------------------------------------------------------------------------

struct FixedCheck<P> {
    envelope: CheckEnvelope<P>,
    calls: AtomicUsize,
}

impl<P> FixedCheck<P> {
    fn new(envelope: CheckEnvelope<P>) -> Self {
        Self {
            envelope,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: Clone + Send + Sync + 'static> HealthCheck for FixedCheck<P> {
    type Payload = P;

    fn source(&self) -> CheckSource {
        self.envelope.source()
    }

    async fn run(&self) -> CheckEnvelope<P> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.envelope.clone()
    }
}

struct StuckCheck;

#[async_trait]
impl HealthCheck for StuckCheck {
    type Payload = DeploymentPayload;

    fn source(&self) -> CheckSource {
        CheckSource::Deployment
    }

    async fn run(&self) -> CheckEnvelope<DeploymentPayload> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct TrackingNotifier {
    reports: Mutex<Vec<AggregateReport>>,
    alerts: Mutex<Vec<Alert>>,
    fail: bool,
}

impl TrackingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn collected_alerts(&self) -> Vec<Alert> {
        self.alerts.lock().expect("lock").clone()
    }

    fn collected_reports(&self) -> Vec<AggregateReport> {
        self.reports.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for TrackingNotifier {
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError> {
        self.reports.lock().expect("lock").push(report.clone());
        if self.fail {
            return Err(NotificationError::SendFailed("HTTP 502".into()));
        }
        Ok(())
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.alerts.lock().expect("lock").push(alert.clone());
        if self.fail {
            return Err(NotificationError::SendFailed("HTTP 502".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scenario builders
// ---------------------------------------------------------------------------

fn endpoint(name: &str, status: HealthStatus) -> EndpointStatus {
    let up = status != HealthStatus::Down;
    EndpointStatus {
        name: name.to_string(),
        url: format!("https://{name}.example.com"),
        status,
        http_status: up.then_some(200),
        response_time_ms: up.then_some(95),
        attempts: if up { 1 } else { 2 },
        error: (!up).then(|| "connection refused".to_string()),
    }
}

fn uptime(site: HealthStatus, api: HealthStatus) -> CheckEnvelope<UptimePayload> {
    CheckEnvelope::succeeded(
        CheckSource::Uptime,
        UptimePayload {
            endpoints: vec![endpoint("site", site), endpoint("api", api)],
        },
    )
}

fn datastore(silent: &[&str]) -> CheckEnvelope<DatastorePayload> {
    CheckEnvelope::succeeded(
        CheckSource::Datastore,
        DatastorePayload {
            status: HealthStatus::Healthy,
            latency_ms: Some(4),
            total_targets: 12,
            active_last_24h: 9,
            silent_threshold_days: 3,
            silent_targets: silent
                .iter()
                .map(|name| SilentTarget {
                    name: (*name).to_string(),
                    last_active: None,
                    days_inactive: None,
                })
                .collect(),
        },
    )
}

fn issues(new_issues: u64) -> CheckEnvelope<IssueTrackerPayload> {
    CheckEnvelope::succeeded(
        CheckSource::IssueTracker,
        IssueTrackerPayload {
            new_issues_24h: new_issues,
            unresolved: new_issues + 4,
            top_issues: vec![],
            issues_url: "https://errors.example.com/organizations/acme/issues/?project=web".into(),
        },
    )
}

fn deployment(state: &str, status: HealthStatus) -> CheckEnvelope<DeploymentPayload> {
    CheckEnvelope::succeeded(
        CheckSource::Deployment,
        DeploymentPayload {
            status,
            service_name: "web".into(),
            dashboard_url: "https://deploy.example.com/project/p1/service/s1".into(),
            latest: Some(DeploymentInfo {
                id: "d-42".into(),
                state: state.into(),
                created_at: None,
            }),
        },
    )
}

fn inbox_not_configured() -> CheckEnvelope<InboxPayload> {
    CheckEnvelope::failed(
        CheckSource::Inbox,
        InboxPayload::default(),
        "inbox check is not configured",
    )
}

struct Stack {
    uptime: FixedCheck<UptimePayload>,
    datastore: FixedCheck<DatastorePayload>,
    issues: FixedCheck<IssueTrackerPayload>,
    deployment: FixedCheck<DeploymentPayload>,
    inbox: FixedCheck<InboxPayload>,
}

impl Stack {
    fn healthy() -> Self {
        Self {
            uptime: FixedCheck::new(uptime(HealthStatus::Healthy, HealthStatus::Healthy)),
            datastore: FixedCheck::new(datastore(&[])),
            issues: FixedCheck::new(issues(0)),
            deployment: FixedCheck::new(deployment("SUCCESS", HealthStatus::Healthy)),
            inbox: FixedCheck::new(inbox_not_configured()),
        }
    }

    fn checks(&self) -> CheckSet<'_> {
        CheckSet {
            uptime: &self.uptime,
            datastore: &self.datastore,
            issues: &self.issues,
            deployment: &self.deployment,
            inbox: &self.inbox,
        }
    }
}

// ---------------------------------------------------------------------------
// Full cycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_morning_briefing() {
    let stack = Stack {
        uptime: FixedCheck::new(uptime(HealthStatus::Healthy, HealthStatus::Down)),
        datastore: FixedCheck::new(datastore(&["globex", "initech"])),
        issues: FixedCheck::new(issues(3)),
        deployment: FixedCheck::new(deployment("CRASHED", HealthStatus::Down)),
        ..Stack::healthy()
    };
    let classifier = AlertClassifier::default();
    let aggregator = Aggregator::new(stack.checks(), &classifier, DEADLINE);

    let report = aggregator.run_full_cycle().await;

    assert_eq!(report.overall_status, HealthStatus::Down);
    let summary: Vec<(Severity, CheckSource)> =
        report.alerts.iter().map(|a| (a.severity, a.source)).collect();
    assert_eq!(
        summary,
        vec![
            (Severity::Critical, CheckSource::Uptime),
            (Severity::Critical, CheckSource::Deployment),
            (Severity::Warning, CheckSource::IssueTracker),
            (Severity::Info, CheckSource::Datastore),
        ]
    );
    assert_eq!(
        report.alerts[1].action_url.as_deref(),
        Some("https://deploy.example.com/project/p1/service/s1")
    );
}

#[tokio::test]
async fn unconfigured_inbox_only_shows_inline() {
    let stack = Stack::healthy();
    let classifier = AlertClassifier::default();
    let aggregator = Aggregator::new(stack.checks(), &classifier, DEADLINE);

    let report = aggregator.run_full_cycle().await;

    assert_eq!(report.overall_status, HealthStatus::Healthy);
    assert!(report.alerts.is_empty());
    assert_eq!(report.checks.failed_count(), 1);
    assert_eq!(
        report.checks.inbox.failure_reason(),
        Some("inbox check is not configured")
    );
}

#[tokio::test]
async fn report_serializes_failures_with_reason() {
    let stack = Stack::healthy();
    let classifier = AlertClassifier::default();
    let report = Aggregator::new(stack.checks(), &classifier, DEADLINE)
        .run_full_cycle()
        .await;

    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["overall_status"], "healthy");
    assert_eq!(json["checks"]["inbox"]["ok"], false);
    assert_eq!(
        json["checks"]["inbox"]["failure_reason"],
        "inbox check is not configured"
    );
    assert!(json["checks"]["uptime"].get("failure_reason").is_none());
}

#[tokio::test(start_paused = true)]
async fn stuck_check_degrades_instead_of_blocking() {
    let stack = Stack::healthy();
    let stuck = StuckCheck;
    let checks = CheckSet {
        deployment: &stuck,
        ..stack.checks()
    };
    let classifier = AlertClassifier::default();

    let report = Aggregator::new(checks, &classifier, DEADLINE)
        .run_full_cycle()
        .await;

    assert!(!report.checks.deployment.ok());
    assert_eq!(report.overall_status, HealthStatus::Degraded);
    assert_eq!(stack.datastore.calls(), 1);
}

// ---------------------------------------------------------------------------
// Quick cycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quick_cycle_is_silent_when_up() {
    let stack = Stack::healthy();
    let notifier = TrackingNotifier::default();
    let sentinel = Sentinel::new(stack.checks(), &notifier, DEADLINE);

    let outcome = sentinel.run_quick_cycle().await;

    assert_eq!(outcome.alerts_raised, 0);
    assert!(notifier.collected_alerts().is_empty());
    assert!(notifier.collected_reports().is_empty());
    assert_eq!(stack.issues.calls(), 0);
    assert_eq!(stack.inbox.calls(), 0);
}

#[tokio::test]
async fn quick_cycle_alerts_each_outage() {
    let stack = Stack {
        uptime: FixedCheck::new(uptime(HealthStatus::Down, HealthStatus::Down)),
        deployment: FixedCheck::new(deployment("FAILED", HealthStatus::Down)),
        ..Stack::healthy()
    };
    let notifier = TrackingNotifier::default();
    let sentinel = Sentinel::new(stack.checks(), &notifier, DEADLINE);

    let outcome = sentinel.run_quick_cycle().await;

    assert_eq!(outcome.alerts_raised, 2);
    assert_eq!(outcome.alerts_delivered, 2);
    let alerts = notifier.collected_alerts();
    assert!(alerts.iter().all(|a| a.severity == Severity::Critical));
    assert!(alerts[0].message.contains("site"));
    assert!(alerts[0].message.contains("api"));
}

#[tokio::test]
async fn quick_cycle_survives_notifier_failure() {
    let stack = Stack {
        deployment: FixedCheck::new(deployment("CRASHED", HealthStatus::Down)),
        ..Stack::healthy()
    };
    let notifier = TrackingNotifier::failing();
    let sentinel = Sentinel::new(stack.checks(), &notifier, DEADLINE);

    let first = sentinel.run_quick_cycle().await;
    let second = sentinel.run_quick_cycle().await;

    assert_eq!(first.alerts_delivered, 0);
    assert_eq!(second.alerts_raised, 1);
    // No deduplication: the same outage is re-sent every cycle.
    assert_eq!(notifier.collected_alerts().len(), 2);
}
