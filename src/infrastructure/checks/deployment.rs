use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{configured, ensure_success, http_client};
use crate::application::config::DeploymentConfig;
use crate::domain::entities::deployment::{DeploymentInfo, DeploymentPayload};
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::ports::check::{CheckError, HealthCheck};
use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::health_status::HealthStatus;

const LATEST_DEPLOYMENT_QUERY: &str = "query latestDeployment($projectId: String!, $serviceId: String!) { \
     deployments(first: 1, input: { projectId: $projectId, serviceId: $serviceId }) { \
       edges { node { id status createdAt } } } }";

/// Map a platform deployment state onto a health status.
#[must_use]
pub fn map_state(state: &str) -> HealthStatus {
    match state.to_ascii_uppercase().as_str() {
        "SUCCESS" => HealthStatus::Healthy,
        "BUILDING" | "DEPLOYING" | "INITIALIZING" | "QUEUED" | "WAITING" => HealthStatus::Degraded,
        "FAILED" | "CRASHED" => HealthStatus::Down,
        _ => HealthStatus::Unknown,
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    deployments: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    id: String,
    status: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Extract the latest deployment from a GraphQL response body.
///
/// # Errors
///
/// Returns `CheckError::InvalidResponse` if the response carries GraphQL
/// errors or no data.
pub fn latest_deployment(response: GraphQlResponse) -> Result<Option<DeploymentInfo>, CheckError> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(CheckError::InvalidResponse(messages.join("; ")));
    }
    let data = response
        .data
        .ok_or_else(|| CheckError::InvalidResponse("response has no data".into()))?;
    Ok(data.deployments.edges.into_iter().next().map(|edge| DeploymentInfo {
        id: edge.node.id,
        state: edge.node.status,
        created_at: edge.node.created_at,
    }))
}

struct Service {
    project_id: String,
    service_id: String,
    token: String,
}

/// Deployment-platform check: state of the service's latest deployment.
pub struct DeploymentCheck {
    client: reqwest::Client,
    api_url: String,
    dashboard_url: String,
    service_name: String,
    service: Option<Service>,
}

impl DeploymentCheck {
    /// # Errors
    ///
    /// Returns `CheckError` if the HTTP client cannot be built.
    pub fn from_config(config: &DeploymentConfig) -> Result<Self, CheckError> {
        let service = match (
            configured(config.project_id.as_ref()),
            configured(config.service_id.as_ref()),
            configured(config.token.as_ref()),
        ) {
            (Some(project_id), Some(service_id), Some(token)) => Some(Service {
                project_id: project_id.to_string(),
                service_id: service_id.to_string(),
                token: token.to_string(),
            }),
            _ => None,
        };
        let dashboard_url = service.as_ref().map_or_else(String::new, |s| {
            format!(
                "{}/project/{}/service/{}",
                config.dashboard_url.trim_end_matches('/'),
                s.project_id,
                s.service_id
            )
        });
        Ok(Self {
            client: http_client(Duration::from_secs(config.timeout_secs))?,
            api_url: config.api_url.clone(),
            dashboard_url,
            service_name: configured(config.service_name.as_ref())
                .or_else(|| configured(config.service_id.as_ref()))
                .unwrap_or("service")
                .to_string(),
            service,
        })
    }

    fn payload(&self, latest: Option<DeploymentInfo>) -> DeploymentPayload {
        DeploymentPayload {
            status: latest.as_ref().map_or(HealthStatus::Unknown, |d| map_state(&d.state)),
            service_name: self.service_name.clone(),
            dashboard_url: self.dashboard_url.clone(),
            latest,
        }
    }

    async fn fetch(&self, service: &Service) -> Result<Option<DeploymentInfo>, CheckError> {
        let body = json!({
            "query": LATEST_DEPLOYMENT_QUERY,
            "variables": {
                "projectId": service.project_id,
                "serviceId": service.service_id,
            }
        });
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&service.token)
            .json(&body)
            .send()
            .await?;
        latest_deployment(ensure_success(response)?.json().await?)
    }
}

#[async_trait]
impl HealthCheck for DeploymentCheck {
    type Payload = DeploymentPayload;

    fn source(&self) -> CheckSource {
        CheckSource::Deployment
    }

    async fn run(&self) -> CheckEnvelope<DeploymentPayload> {
        let Some(service) = &self.service else {
            return CheckEnvelope::failed(
                self.source(),
                self.payload(None),
                CheckError::NotConfigured("deployment project, service or token".into()).to_string(),
            );
        };
        match self.fetch(service).await {
            Ok(latest) => {
                if latest.is_none() {
                    tracing::debug!(service = %self.service_name, "No deployments found");
                }
                CheckEnvelope::succeeded(self.source(), self.payload(latest))
            }
            Err(e) => CheckEnvelope::failed(self.source(), self.payload(None), e.to_string()),
        }
    }
}
