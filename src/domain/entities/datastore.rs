use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::health_status::HealthStatus;

/// A tracked entity with no recorded activity within the silence threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentTarget {
    pub name: String,
    pub last_active: Option<DateTime<Utc>>,
    /// Whole days since `last_active`; `None` if never active.
    pub days_inactive: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastorePayload {
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
    pub total_targets: u64,
    pub active_last_24h: u64,
    pub silent_threshold_days: u32,
    pub silent_targets: Vec<SilentTarget>,
}
