pub mod datastore;
pub mod deployment;
pub mod inbox;
pub mod issues;
pub mod uptime;

use std::time::Duration;

use crate::domain::ports::check::CheckError;

pub use datastore::DatastoreCheck;
pub use deployment::DeploymentCheck;
pub use inbox::InboxCheck;
pub use issues::IssueTrackerCheck;
pub use uptime::UptimeCheck;

/// HTTP client shared by a check's requests. The timeout covers DNS
/// resolution, connection and response.
///
/// # Errors
///
/// Returns `CheckError::NotConfigured` if the client cannot be initialized
/// (e.g. TLS backend failure).
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, CheckError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("opswatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CheckError::NotConfigured(format!("cannot build HTTP client: {e}")))
}

/// Reject non-2xx responses.
pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CheckError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CheckError::HttpStatus(status.as_u16()))
    }
}

/// Returns the value if present and not blank.
pub(crate) fn configured<'a>(value: Option<&'a String>) -> Option<&'a str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}
