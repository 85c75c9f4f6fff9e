use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{configured, ensure_success, http_client};
use crate::application::config::IssuesConfig;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::issues::{IssueSummary, IssueTrackerPayload};
use crate::domain::ports::check::{CheckError, HealthCheck};
use crate::domain::value_objects::check_source::CheckSource;

const TOP_ISSUES: usize = 5;

/// One unresolved issue as listed by the tracker API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    pub title: String,
    #[serde(default)]
    pub culprit: Option<String>,
    /// Event count; the API reports it as a decimal string.
    #[serde(default)]
    pub count: Count,
    #[serde(default)]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(u64),
    Text(String),
}

impl Default for Count {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl Count {
    fn value(&self) -> u64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// Summarize the unresolved list: issues first seen within 24h of `now`
/// count as new; the busiest few are kept for the briefing.
#[must_use]
pub fn summarize_issues(
    issues: &[RawIssue],
    now: DateTime<Utc>,
    issues_url: &str,
) -> IssueTrackerPayload {
    let day_ago = now - chrono::Duration::hours(24);
    let new_issues_24h = issues
        .iter()
        .filter(|i| i.first_seen.is_some_and(|t| t >= day_ago))
        .count() as u64;

    let mut top: Vec<IssueSummary> = issues
        .iter()
        .map(|i| IssueSummary {
            title: i.title.clone(),
            culprit: i.culprit.clone().filter(|c| !c.is_empty()),
            events: i.count.value(),
            first_seen: i.first_seen,
            permalink: i.permalink.clone(),
        })
        .collect();
    top.sort_by(|a, b| b.events.cmp(&a.events));
    top.truncate(TOP_ISSUES);

    IssueTrackerPayload {
        new_issues_24h,
        unresolved: issues.len() as u64,
        top_issues: top,
        issues_url: issues_url.to_string(),
    }
}

struct Project {
    org: String,
    project: String,
    token: String,
}

/// Error-tracker check: unresolved issues seen in the last 24 hours.
pub struct IssueTrackerCheck {
    client: reqwest::Client,
    base_url: String,
    project: Option<Project>,
}

impl IssueTrackerCheck {
    /// # Errors
    ///
    /// Returns `CheckError` if the HTTP client cannot be built.
    pub fn from_config(config: &IssuesConfig) -> Result<Self, CheckError> {
        let project = match (
            configured(config.org.as_ref()),
            configured(config.project.as_ref()),
            configured(config.token.as_ref()),
        ) {
            (Some(org), Some(project), Some(token)) => Some(Project {
                org: org.to_string(),
                project: project.to_string(),
                token: token.to_string(),
            }),
            _ => None,
        };
        Ok(Self {
            client: http_client(Duration::from_secs(config.timeout_secs))?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project,
        })
    }

    fn issues_url(&self, project: &Project) -> String {
        format!(
            "{}/organizations/{}/issues/?project={}",
            self.base_url, project.org, project.project
        )
    }

    async fn fetch(&self, project: &Project) -> Result<IssueTrackerPayload, CheckError> {
        let url = format!(
            "{}/api/0/projects/{}/{}/issues/",
            self.base_url, project.org, project.project
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&project.token)
            .query(&[("query", "is:unresolved"), ("statsPeriod", "24h")])
            .send()
            .await?;
        let issues: Vec<RawIssue> = ensure_success(response)?.json().await?;
        Ok(summarize_issues(&issues, Utc::now(), &self.issues_url(project)))
    }
}

#[async_trait]
impl HealthCheck for IssueTrackerCheck {
    type Payload = IssueTrackerPayload;

    fn source(&self) -> CheckSource {
        CheckSource::IssueTracker
    }

    async fn run(&self) -> CheckEnvelope<IssueTrackerPayload> {
        let Some(project) = &self.project else {
            return CheckEnvelope::failed_default(
                self.source(),
                CheckError::NotConfigured("issue tracker org, project or token".into()).to_string(),
            );
        };
        match self.fetch(project).await {
            Ok(payload) => CheckEnvelope::succeeded(self.source(), payload),
            Err(e) => CheckEnvelope::failed(
                self.source(),
                IssueTrackerPayload {
                    issues_url: self.issues_url(project),
                    ..IssueTrackerPayload::default()
                },
                e.to_string(),
            ),
        }
    }
}
