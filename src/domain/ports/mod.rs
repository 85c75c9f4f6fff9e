pub mod check;
pub mod notifier;

pub use check::{CheckError, HealthCheck};
pub use notifier::{NotificationError, Notifier};
