use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::check_source::CheckSource;

const UNSPECIFIED_FAILURE: &str = "unspecified failure";

/// Uniform result of one check run.
///
/// `ok` says whether the check itself ran to completion, not whether the
/// monitored target is healthy: a check can succeed and report a target as
/// down. The fields are private so that `ok == false` always comes with a
/// non-empty `failure_reason`, and `ok == true` never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawEnvelope<P>",
    bound(deserialize = "P: Deserialize<'de>")
)]
pub struct CheckEnvelope<P> {
    source: CheckSource,
    ok: bool,
    observed_at: DateTime<Utc>,
    payload: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
}

impl<P> CheckEnvelope<P> {
    /// The check completed and determined `payload`.
    #[must_use]
    pub fn succeeded(source: CheckSource, payload: P) -> Self {
        Self {
            source,
            ok: true,
            observed_at: Utc::now(),
            payload,
            failure_reason: None,
        }
    }

    /// The check could not reach a verdict. `payload` should carry
    /// zero/sentinel values.
    #[must_use]
    pub fn failed(source: CheckSource, payload: P, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            UNSPECIFIED_FAILURE.to_string()
        } else {
            reason
        };
        Self {
            source,
            ok: false,
            observed_at: Utc::now(),
            payload,
            failure_reason: Some(reason),
        }
    }

    #[must_use]
    pub const fn source(&self) -> CheckSource {
        self.source
    }

    #[must_use]
    pub const fn ok(&self) -> bool {
        self.ok
    }

    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Payload of a successful check, `None` if the check failed.
    #[must_use]
    pub const fn determined(&self) -> Option<&P> {
        if self.ok { Some(&self.payload) } else { None }
    }
}

impl<P: Default> CheckEnvelope<P> {
    /// Failed envelope with a default (sentinel) payload.
    #[must_use]
    pub fn failed_default(source: CheckSource, reason: impl Into<String>) -> Self {
        Self::failed(source, P::default(), reason)
    }
}

/// Serialized form, checked before it becomes a [`CheckEnvelope`].
#[derive(Deserialize)]
struct RawEnvelope<P> {
    source: CheckSource,
    ok: bool,
    observed_at: DateTime<Utc>,
    payload: P,
    #[serde(default)]
    failure_reason: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("failed {0} envelope has no failure_reason")]
    MissingReason(CheckSource),

    #[error("successful {0} envelope carries a failure_reason")]
    UnexpectedReason(CheckSource),
}

impl<P> TryFrom<RawEnvelope<P>> for CheckEnvelope<P> {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope<P>) -> Result<Self, Self::Error> {
        let mut envelope = match (raw.ok, raw.failure_reason) {
            (true, None) => Self::succeeded(raw.source, raw.payload),
            (false, Some(reason)) => Self::failed(raw.source, raw.payload, reason),
            (false, None) => return Err(EnvelopeError::MissingReason(raw.source)),
            (true, Some(_)) => return Err(EnvelopeError::UnexpectedReason(raw.source)),
        };
        envelope.observed_at = raw.observed_at;
        Ok(envelope)
    }
}
