use serde::{Deserialize, Serialize};

/// Identifies which check produced an envelope or an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckSource {
    Uptime,
    Datastore,
    IssueTracker,
    Deployment,
    Inbox,
}

impl CheckSource {
    pub const ALL: [Self; 5] = [
        Self::Uptime,
        Self::Datastore,
        Self::IssueTracker,
        Self::Deployment,
        Self::Inbox,
    ];

    /// Stable identifier, identical to the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uptime => "uptime",
            Self::Datastore => "datastore",
            Self::IssueTracker => "issue_tracker",
            Self::Deployment => "deployment",
            Self::Inbox => "inbox",
        }
    }

    /// Human label used in briefings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Uptime => "Uptime",
            Self::Datastore => "Database",
            Self::IssueTracker => "Errors",
            Self::Deployment => "Deployment",
            Self::Inbox => "Inbox",
        }
    }
}

impl std::fmt::Display for CheckSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
