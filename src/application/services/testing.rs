//! Hand-written port doubles shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::aggregator::CheckSet;
use crate::domain::entities::alert::Alert;
use crate::domain::entities::datastore::DatastorePayload;
use crate::domain::entities::deployment::DeploymentPayload;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::inbox::InboxPayload;
use crate::domain::entities::issues::IssueTrackerPayload;
use crate::domain::entities::report::{AggregateReport, CheckResults, fixtures};
use crate::domain::entities::uptime::UptimePayload;
use crate::domain::ports::check::HealthCheck;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::check_source::CheckSource;

enum Behavior<P> {
    Return(CheckEnvelope<P>),
    Delay(Duration, CheckEnvelope<P>),
    Hang,
    Panic,
}

pub struct StubCheck<P> {
    source: CheckSource,
    behavior: Behavior<P>,
    calls: AtomicUsize,
}

impl<P> StubCheck<P> {
    fn with(source: CheckSource, behavior: Behavior<P>) -> Self {
        Self {
            source,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(envelope: CheckEnvelope<P>) -> Self {
        Self::with(envelope.source(), Behavior::Return(envelope))
    }

    pub fn delayed(delay: Duration, envelope: CheckEnvelope<P>) -> Self {
        Self::with(envelope.source(), Behavior::Delay(delay, envelope))
    }

    pub fn hanging(source: CheckSource) -> Self {
        Self::with(source, Behavior::Hang)
    }

    pub fn panicking(source: CheckSource) -> Self {
        Self::with(source, Behavior::Panic)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: Default> StubCheck<P> {
    pub fn failing(source: CheckSource, reason: &str) -> Self {
        Self::returning(CheckEnvelope::failed_default(source, reason))
    }
}

#[async_trait]
impl<P> HealthCheck for StubCheck<P>
where
    P: Clone + Send + Sync + 'static,
{
    type Payload = P;

    fn source(&self) -> CheckSource {
        self.source
    }

    async fn run(&self) -> CheckEnvelope<P> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Return(env) => env.clone(),
            Behavior::Delay(delay, env) => {
                tokio::time::sleep(*delay).await;
                env.clone()
            }
            Behavior::Hang => std::future::pending().await,
            Behavior::Panic => panic!("stub check panicked"),
        }
    }
}

/// One stub per slot.
pub struct Stubs {
    pub uptime: StubCheck<UptimePayload>,
    pub datastore: StubCheck<DatastorePayload>,
    pub issues: StubCheck<IssueTrackerPayload>,
    pub deployment: StubCheck<DeploymentPayload>,
    pub inbox: StubCheck<InboxPayload>,
}

impl Stubs {
    pub fn returning(results: CheckResults) -> Self {
        Self {
            uptime: StubCheck::returning(results.uptime),
            datastore: StubCheck::returning(results.datastore),
            issues: StubCheck::returning(results.issues),
            deployment: StubCheck::returning(results.deployment),
            inbox: StubCheck::returning(results.inbox),
        }
    }

    pub fn healthy() -> Self {
        Self::returning(fixtures::healthy_results())
    }

    pub fn failing() -> Self {
        Self {
            uptime: StubCheck::failing(CheckSource::Uptime, "dns error"),
            datastore: StubCheck::failing(CheckSource::Datastore, "auth failed"),
            issues: StubCheck::failing(CheckSource::IssueTracker, "HTTP 401"),
            deployment: StubCheck::failing(CheckSource::Deployment, "graphql error"),
            inbox: StubCheck::failing(CheckSource::Inbox, "not configured"),
        }
    }

    pub fn set(&self) -> CheckSet<'_> {
        CheckSet {
            uptime: &self.uptime,
            datastore: &self.datastore,
            issues: &self.issues,
            deployment: &self.deployment,
            inbox: &self.inbox,
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    reports: Mutex<Vec<AggregateReport>>,
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn reports(&self) -> Vec<AggregateReport> {
        self.reports.lock().expect("lock").clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_report(&self, report: &AggregateReport) -> Result<(), NotificationError> {
        self.reports.lock().expect("lock").push(report.clone());
        Ok(())
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.alerts.lock().expect("lock").push(alert.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_report(&self, _report: &AggregateReport) -> Result<(), NotificationError> {
        Err(NotificationError::SendFailed("HTTP 500".into()))
    }

    async fn send_alert(&self, _alert: &Alert) -> Result<(), NotificationError> {
        Err(NotificationError::SendFailed("HTTP 500".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stubs_report_the_slot_they_fill() {
        let hang = StubCheck::<DeploymentPayload>::hanging(CheckSource::Deployment);
        let panic = StubCheck::<IssueTrackerPayload>::panicking(CheckSource::IssueTracker);
        assert_eq!(hang.source(), CheckSource::Deployment);
        assert_eq!(panic.source(), CheckSource::IssueTracker);

        let stubs = Stubs::failing();
        assert_eq!(stubs.inbox.source(), CheckSource::Inbox);
        assert_eq!(stubs.datastore.source(), CheckSource::Datastore);
    }
}
