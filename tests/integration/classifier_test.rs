#![allow(clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};

use opswatch::domain::entities::{
    CheckEnvelope, CheckResults, DatastorePayload, DeploymentPayload, EndpointStatus, InboxPayload,
    UptimePayload,
};
use opswatch::domain::rules::{AlertClassifier, derive_overall_status, outage_alerts};
use opswatch::domain::value_objects::{CheckSource, HealthStatus, Severity};
use opswatch::infrastructure::checks::datastore::summarize_activity;
use opswatch::infrastructure::checks::deployment::{latest_deployment, map_state};
use opswatch::infrastructure::checks::issues::{RawIssue, summarize_issues};

// ---------------------------------------------------------------------------
// Fixture loader
// ---------------------------------------------------------------------------

fn read_fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("Failed to read fixture")
}

fn briefing_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0)
        .single()
        .expect("valid date")
}

fn quiet_results() -> CheckResults {
    CheckResults {
        uptime: CheckEnvelope::succeeded(
            CheckSource::Uptime,
            UptimePayload {
                endpoints: vec![EndpointStatus {
                    name: "site".into(),
                    url: "https://site.example.com".into(),
                    status: HealthStatus::Healthy,
                    http_status: Some(200),
                    response_time_ms: Some(80),
                    attempts: 1,
                    error: None,
                }],
            },
        ),
        datastore: CheckEnvelope::succeeded(
            CheckSource::Datastore,
            DatastorePayload {
                status: HealthStatus::Healthy,
                silent_threshold_days: 3,
                ..DatastorePayload::default()
            },
        ),
        issues: CheckEnvelope::succeeded(CheckSource::IssueTracker, Default::default()),
        deployment: CheckEnvelope::succeeded(
            CheckSource::Deployment,
            DeploymentPayload {
                status: HealthStatus::Healthy,
                ..DeploymentPayload::default()
            },
        ),
        inbox: CheckEnvelope::succeeded(CheckSource::Inbox, InboxPayload::default()),
    }
}

fn deployment_from_fixture() -> CheckEnvelope<DeploymentPayload> {
    let body = serde_json::from_str(&read_fixture("deployment.json")).expect("valid json");
    let latest = latest_deployment(body).expect("no graphql errors");
    CheckEnvelope::succeeded(
        CheckSource::Deployment,
        DeploymentPayload {
            status: latest
                .as_ref()
                .map_or(HealthStatus::Unknown, |d| map_state(&d.state)),
            service_name: "web".into(),
            dashboard_url: "https://deploy.example.com/project/p1/service/s1".into(),
            latest,
        },
    )
}

// ---------------------------------------------------------------------------
// Fixture-driven classification
// ---------------------------------------------------------------------------

#[test]
fn issue_fixture_raises_warning_with_link() {
    let raw: Vec<RawIssue> =
        serde_json::from_str(&read_fixture("issues.json")).expect("Failed to parse fixture");
    let url = "https://errors.example.com/organizations/acme/issues/?project=web";
    let mut results = quiet_results();
    results.issues = CheckEnvelope::succeeded(
        CheckSource::IssueTracker,
        summarize_issues(&raw, briefing_time(), url),
    );

    let alerts = AlertClassifier::default().classify(&results);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert_eq!(alerts[0].message, "2 new issue(s) in the last 24h");
    assert_eq!(alerts[0].action_url.as_deref(), Some(url));
    let detail = alerts[0].detail.as_deref().expect("top issues listed");
    assert!(detail.starts_with("TypeError: cannot read properties of undefined (412 events)"));
    assert_eq!(detail.lines().count(), 3);
    assert_eq!(derive_overall_status(&results), HealthStatus::Healthy);
}

#[test]
fn crashed_deployment_fixture_is_critical_everywhere() {
    let mut results = quiet_results();
    results.deployment = deployment_from_fixture();

    let alerts = AlertClassifier::default().classify(&results);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].message, "Deployment of web is down");
    assert_eq!(derive_overall_status(&results), HealthStatus::Down);

    let quick = outage_alerts(&results.uptime, &results.deployment);
    assert_eq!(quick, alerts);
}

#[test]
fn silent_targets_from_activity_rows() {
    let now = briefing_time();
    let rows = vec![
        ("acme".to_string(), Some(now - chrono::Duration::hours(2))),
        ("globex".to_string(), Some(now - chrono::Duration::days(5))),
        ("initech".to_string(), None),
    ];
    let (total, active, silent) = summarize_activity(&rows, now, 3);
    let mut results = quiet_results();
    results.datastore = CheckEnvelope::succeeded(
        CheckSource::Datastore,
        DatastorePayload {
            status: HealthStatus::Healthy,
            latency_ms: Some(3),
            total_targets: total,
            active_last_24h: active,
            silent_threshold_days: 3,
            silent_targets: silent,
        },
    );

    let alerts = AlertClassifier::default().classify(&results);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Info);
    assert_eq!(alerts[0].message, "2 target(s) silent for 3+ days");
    assert_eq!(alerts[0].detail.as_deref(), Some("initech, globex"));
}

#[test]
fn alerts_are_ordered_critical_first() {
    let raw: Vec<RawIssue> =
        serde_json::from_str(&read_fixture("issues.json")).expect("Failed to parse fixture");
    let mut results = quiet_results();
    results.issues = CheckEnvelope::succeeded(
        CheckSource::IssueTracker,
        summarize_issues(&raw, briefing_time(), ""),
    );
    results.deployment = deployment_from_fixture();

    let alerts = AlertClassifier::default().classify(&results);

    let severities: Vec<Severity> = alerts.iter().map(|a| a.severity).collect();
    assert_eq!(severities, vec![Severity::Critical, Severity::Warning]);
}

#[test]
fn failed_checks_never_read_as_healthy() {
    let mut results = quiet_results();
    results.uptime = CheckEnvelope::failed_default(CheckSource::Uptime, "dns lookup failed");

    assert_eq!(derive_overall_status(&results), HealthStatus::Degraded);
    assert!(AlertClassifier::default().classify(&results).is_empty());

    let quick = outage_alerts(&results.uptime, &results.deployment);
    assert_eq!(quick.len(), 1);
    assert_eq!(quick[0].severity, Severity::Warning);
    assert!(quick[0].detail.as_deref().is_some_and(|d| d.contains("dns lookup failed")));
}
