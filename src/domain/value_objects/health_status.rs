use serde::{Deserialize, Serialize};

/// Health of a monitored target, as determined by a check.
///
/// `Unknown` is the sentinel carried by payloads whose check could not
/// reach a verdict.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    #[default]
    Unknown,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Down => write!(f, "down"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl HealthStatus {
    #[must_use]
    pub const fn emoji(&self) -> &str {
        match self {
            Self::Healthy => "\u{1f7e2}",
            Self::Degraded => "\u{1f7e1}",
            Self::Down => "\u{1f534}",
            Self::Unknown => "\u{26aa}",
        }
    }

    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
