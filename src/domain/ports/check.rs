use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::value_objects::check_source::CheckSource;

/// Faults a check can hit while talking to its target.
///
/// These never leave a check: they are folded into the envelope's
/// `failure_reason` at the adapter boundary.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("check is not configured: {0}")]
    NotConfigured(String),
    #[error("target unreachable: {0}")]
    Unreachable(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Unreachable(e.to_string())
        }
    }
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    type Payload: Send;

    fn source(&self) -> CheckSource;

    /// Run the check once.
    ///
    /// Never fails: every fault is reported as a failed envelope.
    async fn run(&self) -> CheckEnvelope<Self::Payload>;
}
