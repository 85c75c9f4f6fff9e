use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::configured;
use crate::application::config::DatastoreConfig;
use crate::domain::entities::datastore::{DatastorePayload, SilentTarget};
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::ports::check::{CheckError, HealthCheck};
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::health_status::HealthStatus;

/// Row returned by the activity query: target name and its latest activity.
pub type ActivityRow = (String, Option<DateTime<Utc>>);

/// Postgres probe: connection health, round-trip latency and per-target
/// activity.
///
/// An unreachable database is a determined result (status `Down`); only a
/// failure after the connection succeeded makes the check itself fail.
pub struct DatastoreCheck {
    pool: Result<PgPool, String>,
    timeout: Duration,
    slow_query: Duration,
    silent_days: u32,
    activity_query: String,
}

impl DatastoreCheck {
    /// Builds a lazy single-connection pool; nothing is dialed until the
    /// first run.
    #[must_use]
    pub fn from_config(config: &DatastoreConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let pool = match configured(config.database_url.as_ref()) {
            None => Err(CheckError::NotConfigured("database url".into()).to_string()),
            Some(url) => PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(timeout)
                .connect_lazy(url)
                // The url carries credentials; keep it out of the reason.
                .map_err(|_| CheckError::NotConfigured("database url is malformed".into()).to_string()),
        };
        Self {
            pool,
            timeout,
            slow_query: Duration::from_millis(config.slow_query_ms),
            silent_days: config.silent_days,
            activity_query: config.activity_query.clone(),
        }
    }

    async fn ping(&self, pool: &PgPool) -> Result<Duration, CheckError> {
        let started = Instant::now();
        tokio::time::timeout(self.timeout, sqlx::query("SELECT 1").execute(pool))
            .await
            .map_err(|_| CheckError::Timeout)?
            .map_err(|e| CheckError::Unreachable(e.to_string()))?;
        Ok(started.elapsed())
    }

    async fn activity(&self, pool: &PgPool) -> Result<Vec<ActivityRow>, CheckError> {
        tokio::time::timeout(
            self.timeout,
            sqlx::query_as::<_, ActivityRow>(self.activity_query.as_str()).fetch_all(pool),
        )
        .await
        .map_err(|_| CheckError::Timeout)?
        .map_err(|e| CheckError::Query(e.to_string()))
    }

    fn empty_payload(&self, status: HealthStatus) -> DatastorePayload {
        DatastorePayload {
            status,
            silent_threshold_days: self.silent_days,
            ..DatastorePayload::default()
        }
    }
}

/// Fold activity rows into totals and the silent list.
///
/// A target is silent if it never had activity or its latest activity is at
/// least `silent_days` whole days old. Never-active targets come first, then
/// the longest silence.
#[must_use]
pub fn summarize_activity(
    rows: &[ActivityRow],
    now: DateTime<Utc>,
    silent_days: u32,
) -> (u64, u64, Vec<SilentTarget>) {
    let day_ago = now - chrono::Duration::hours(24);
    let total = rows.len() as u64;
    let active = rows
        .iter()
        .filter(|(_, last)| last.is_some_and(|t| t >= day_ago))
        .count() as u64;

    let mut silent: Vec<SilentTarget> = rows
        .iter()
        .filter_map(|(name, last_active)| {
            let days_inactive = last_active.map(|t| (now - t).num_days());
            let is_silent = days_inactive.is_none_or(|d| d >= i64::from(silent_days));
            is_silent.then(|| SilentTarget {
                name: name.clone(),
                last_active: *last_active,
                days_inactive,
            })
        })
        .collect();
    silent.sort_by(|a, b| match (a.days_inactive, b.days_inactive) {
        (None, None) => a.name.cmp(&b.name),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.name.cmp(&b.name)),
    });

    (total, active, silent)
}

#[async_trait]
impl HealthCheck for DatastoreCheck {
    type Payload = DatastorePayload;

    fn source(&self) -> CheckSource {
        CheckSource::Datastore
    }

    async fn run(&self) -> CheckEnvelope<DatastorePayload> {
        let pool = match &self.pool {
            Ok(pool) => pool,
            Err(reason) => return CheckEnvelope::failed_default(self.source(), reason.as_str()),
        };

        let latency = match self.ping(pool).await {
            Ok(latency) => latency,
            Err(e) => {
                tracing::warn!("Datastore unreachable: {e}");
                return CheckEnvelope::succeeded(self.source(), self.empty_payload(HealthStatus::Down));
            }
        };
        let status = if latency > self.slow_query {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let rows = match self.activity(pool).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckEnvelope::failed(
                    self.source(),
                    self.empty_payload(HealthStatus::Unknown),
                    e.to_string(),
                );
            }
        };
        let (total_targets, active_last_24h, silent_targets) =
            summarize_activity(&rows, Utc::now(), self.silent_days);
        tracing::debug!(
            total_targets,
            active_last_24h,
            silent = silent_targets.len(),
            "Datastore activity summarized"
        );

        CheckEnvelope::succeeded(
            self.source(),
            DatastorePayload {
                status,
                latency_ms: Some(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)),
                total_targets,
                active_last_24h,
                silent_threshold_days: self.silent_days,
                silent_targets,
            },
        )
    }
}
