use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::health_status::HealthStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub id: String,
    /// Raw state reported by the deployment platform.
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPayload {
    pub status: HealthStatus,
    pub service_name: String,
    pub dashboard_url: String,
    pub latest: Option<DeploymentInfo>,
}
