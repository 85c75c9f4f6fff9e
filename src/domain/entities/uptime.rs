use serde::{Deserialize, Serialize};

use crate::domain::value_objects::health_status::HealthStatus;

/// Outcome of probing one URL target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub name: String,
    pub url: String,
    pub status: HealthStatus,
    pub http_status: Option<u16>,
    pub response_time_ms: Option<u64>,
    pub attempts: u32,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimePayload {
    pub endpoints: Vec<EndpointStatus>,
}

impl UptimePayload {
    /// Aggregate health of all endpoints: any down wins, then any degraded.
    #[must_use]
    pub fn status(&self) -> HealthStatus {
        if self.endpoints.is_empty() {
            return HealthStatus::Unknown;
        }
        let statuses = || self.endpoints.iter().map(|e| e.status);
        if statuses().any(|s| s == HealthStatus::Down) {
            HealthStatus::Down
        } else if statuses().any(|s| s != HealthStatus::Healthy) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    #[must_use]
    pub fn down_endpoints(&self) -> Vec<&EndpointStatus> {
        self.endpoints
            .iter()
            .filter(|e| e.status == HealthStatus::Down)
            .collect()
    }
}
