use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub title: String,
    pub culprit: Option<String>,
    pub events: u64,
    pub first_seen: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTrackerPayload {
    pub new_issues_24h: u64,
    pub unresolved: u64,
    /// Most frequent unresolved issues, highest event count first.
    pub top_issues: Vec<IssueSummary>,
    pub issues_url: String,
}
