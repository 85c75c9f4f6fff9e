pub mod alert;
pub mod datastore;
pub mod deployment;
pub mod envelope;
pub mod inbox;
pub mod issues;
pub mod report;
pub mod uptime;

pub use alert::Alert;
pub use datastore::{DatastorePayload, SilentTarget};
pub use deployment::{DeploymentInfo, DeploymentPayload};
pub use envelope::CheckEnvelope;
pub use inbox::{InboxPayload, MessageSummary};
pub use issues::{IssueSummary, IssueTrackerPayload};
pub use report::{AggregateReport, CheckResults};
pub use uptime::{EndpointStatus, UptimePayload};
