use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::value_objects::check_source::CheckSource;

pub const ABORTED_REASON: &str = "check aborted unexpectedly";

/// Await one check, converting a hang or a panic into a failed envelope.
///
/// Checks already report their own faults as data; this covers the cases
/// where a check breaks that contract, so the rest of the cycle still
/// completes.
pub async fn guarded<P, F>(source: CheckSource, deadline: Duration, check: F) -> CheckEnvelope<P>
where
    P: Default,
    F: Future<Output = CheckEnvelope<P>>,
{
    match tokio::time::timeout(deadline, AssertUnwindSafe(check).catch_unwind()).await {
        Ok(Ok(envelope)) => {
            if let Some(reason) = envelope.failure_reason() {
                tracing::warn!(check = %source, "check failed: {reason}");
            }
            envelope
        }
        Ok(Err(_)) => {
            tracing::error!(check = %source, "check panicked");
            CheckEnvelope::failed_default(source, ABORTED_REASON)
        }
        Err(_) => {
            tracing::error!(check = %source, "check exceeded {}s deadline", deadline.as_secs());
            CheckEnvelope::failed_default(source, deadline_reason(deadline))
        }
    }
}

#[must_use]
pub fn deadline_reason(deadline: Duration) -> String {
    format!("check did not finish within {}s", deadline.as_secs())
}
