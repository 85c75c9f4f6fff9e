use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;

use super::http_client;
use crate::application::config::UptimeConfig;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::uptime::{EndpointStatus, UptimePayload};
use crate::domain::ports::check::{CheckError, HealthCheck};
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::health_status::HealthStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub elapsed: Duration,
}

/// One HTTP round-trip to a target. Any response, whatever its status, is
/// `Ok`; only transport failures and timeouts are errors.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, CheckError>;
}

pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns `CheckError` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, CheckError> {
        let started = Instant::now();
        let response = self.client.get(url).send().await?;
        Ok(ProbeResponse {
            status: response.status().as_u16(),
            elapsed: started.elapsed(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeTarget {
    pub name: String,
    pub url: String,
}

/// Pings each target; 2xx is healthy, any other status degraded, and no
/// response at all, twice in a row, down.
pub struct UptimeCheck<P = HttpProbe> {
    targets: Vec<UptimeTarget>,
    probe: P,
    retry_delay: Duration,
}

impl UptimeCheck<HttpProbe> {
    /// # Errors
    ///
    /// Returns `CheckError` if the HTTP client cannot be built.
    pub fn from_config(config: &UptimeConfig) -> Result<Self, CheckError> {
        let targets = [("site", &config.site_url), ("api", &config.api_url)]
            .into_iter()
            .filter_map(|(name, url)| {
                super::configured(url.as_ref()).map(|url| UptimeTarget {
                    name: name.to_string(),
                    url: url.to_string(),
                })
            })
            .collect();
        Ok(Self::new(
            targets,
            HttpProbe::new(Duration::from_secs(config.timeout_secs))?,
            Duration::from_secs(config.retry_delay_secs),
        ))
    }
}

impl<P: EndpointProbe> UptimeCheck<P> {
    #[must_use]
    pub const fn new(targets: Vec<UptimeTarget>, probe: P, retry_delay: Duration) -> Self {
        Self {
            targets,
            probe,
            retry_delay,
        }
    }

    async fn check_target(&self, target: &UptimeTarget) -> EndpointStatus {
        let first = match self.probe.probe(&target.url).await {
            Ok(response) => return endpoint_status(target, Ok(response), 1),
            Err(e) => e,
        };
        tracing::debug!(
            target = %target.name,
            "probe failed ({first}), retrying in {}s",
            self.retry_delay.as_secs()
        );

        tokio::time::sleep(self.retry_delay).await;
        endpoint_status(target, self.probe.probe(&target.url).await, 2)
    }
}

fn endpoint_status(
    target: &UptimeTarget,
    outcome: Result<ProbeResponse, CheckError>,
    attempts: u32,
) -> EndpointStatus {
    let (status, http_status, response_time_ms, error) = match outcome {
        Ok(response) => {
            let status = if (200..300).contains(&response.status) {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            };
            let millis = u64::try_from(response.elapsed.as_millis()).unwrap_or(u64::MAX);
            (status, Some(response.status), Some(millis), None)
        }
        Err(e) => (HealthStatus::Down, None, None, Some(e.to_string())),
    };
    EndpointStatus {
        name: target.name.clone(),
        url: target.url.clone(),
        status,
        http_status,
        response_time_ms,
        attempts,
        error,
    }
}

#[async_trait]
impl<P: EndpointProbe> HealthCheck for UptimeCheck<P> {
    type Payload = UptimePayload;

    fn source(&self) -> CheckSource {
        CheckSource::Uptime
    }

    async fn run(&self) -> CheckEnvelope<UptimePayload> {
        if self.targets.is_empty() {
            return CheckEnvelope::failed_default(
                self.source(),
                CheckError::NotConfigured("no uptime targets".into()).to_string(),
            );
        }
        let endpoints = join_all(self.targets.iter().map(|t| self.check_target(t))).await;
        CheckEnvelope::succeeded(self.source(), UptimePayload { endpoints })
    }
}
