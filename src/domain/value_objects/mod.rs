pub mod check_source;
pub mod health_status;
pub mod severity;

pub use check_source::CheckSource;
pub use health_status::HealthStatus;
pub use severity::Severity;
