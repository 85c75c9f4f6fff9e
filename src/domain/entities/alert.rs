use serde::{Deserialize, Serialize};

use crate::domain::value_objects::check_source::CheckSource;
use crate::domain::value_objects::severity::Severity;

/// A classified condition worth telling someone about.
///
/// Alerts are produced fresh on every cycle and carry no identity beyond
/// their field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub source: CheckSource,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn new(severity: Severity, source: CheckSource, message: impl Into<String>) -> Self {
        Self {
            severity,
            source,
            message: message.into(),
            detail: None,
            action_url: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach a link; blank URLs are ignored.
    #[must_use]
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.action_url = Some(url);
        }
        self
    }
}
