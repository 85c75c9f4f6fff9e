use crate::domain::entities::report::CheckResults;
use crate::domain::value_objects::health_status::HealthStatus;

/// Derive the overall status from the status-bearing checks: uptime,
/// datastore and deployment. Issues and inbox never contribute.
///
/// A contributor that failed, or reported `Unknown`, is indeterminate: it
/// cannot vote healthy, so it caps the result at `Degraded`, but it never
/// forces `Down` on its own.
#[must_use]
pub fn derive_overall_status(checks: &CheckResults) -> HealthStatus {
    let contributors = [
        checks.uptime.determined().map(|p| p.status()),
        checks.datastore.determined().map(|p| p.status),
        checks.deployment.determined().map(|p| p.status),
    ];
    combine(&contributors)
}

/// `None` marks an indeterminate contributor.
#[must_use]
pub fn combine(contributors: &[Option<HealthStatus>]) -> HealthStatus {
    let has = |wanted: HealthStatus| contributors.iter().any(|c| *c == Some(wanted));

    if has(HealthStatus::Down) {
        HealthStatus::Down
    } else if has(HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else if contributors
        .iter()
        .any(|c| matches!(c, None | Some(HealthStatus::Unknown)))
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
