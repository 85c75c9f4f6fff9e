use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{configured, ensure_success, http_client};
use crate::application::config::InboxConfig;
use crate::domain::entities::envelope::CheckEnvelope;
use crate::domain::entities::inbox::{InboxPayload, MessageSummary};
use crate::domain::ports::check::{CheckError, HealthCheck};
use crate::domain::value_objects::check_source::CheckSource;

const RECENT_MESSAGES: usize = 5;

#[derive(Debug, Deserialize)]
pub struct MailboxResponse {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    from: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    unread: bool,
}

/// Count unread messages and keep the newest unread ones.
#[must_use]
pub fn summarize_inbox(response: MailboxResponse) -> InboxPayload {
    let mut unread: Vec<RawMessage> = response.messages.into_iter().filter(|m| m.unread).collect();
    unread.sort_by(|a, b| b.received_at.cmp(&a.received_at));

    InboxPayload {
        unread: unread.len() as u64,
        recent: unread
            .into_iter()
            .take(RECENT_MESSAGES)
            .map(|m| MessageSummary {
                from: m.from,
                subject: if m.subject.is_empty() { "(no subject)".into() } else { m.subject },
                received_at: m.received_at,
            })
            .collect(),
    }
}

struct Mailbox {
    url: String,
    token: Option<String>,
}

/// Mailbox check against a JSON inbox endpoint. Optional: when no endpoint
/// is configured the check reports itself as not run.
pub struct InboxCheck {
    client: reqwest::Client,
    mailbox: Option<Mailbox>,
}

impl InboxCheck {
    /// # Errors
    ///
    /// Returns `CheckError` if the HTTP client cannot be built.
    pub fn from_config(config: &InboxConfig) -> Result<Self, CheckError> {
        Ok(Self {
            client: http_client(Duration::from_secs(config.timeout_secs))?,
            mailbox: configured(config.url.as_ref()).map(|url| Mailbox {
                url: url.to_string(),
                token: configured(config.token.as_ref()).map(str::to_string),
            }),
        })
    }

    async fn fetch(&self, mailbox: &Mailbox) -> Result<InboxPayload, CheckError> {
        let mut request = self.client.get(&mailbox.url);
        if let Some(token) = &mailbox.token {
            request = request.bearer_auth(token);
        }
        let response = ensure_success(request.send().await?)?;
        Ok(summarize_inbox(response.json().await?))
    }
}

#[async_trait]
impl HealthCheck for InboxCheck {
    type Payload = InboxPayload;

    fn source(&self) -> CheckSource {
        CheckSource::Inbox
    }

    async fn run(&self) -> CheckEnvelope<InboxPayload> {
        let Some(mailbox) = &self.mailbox else {
            return CheckEnvelope::failed_default(self.source(), "inbox check is not configured");
        };
        match self.fetch(mailbox).await {
            Ok(payload) => CheckEnvelope::succeeded(self.source(), payload),
            Err(e) => CheckEnvelope::failed_default(self.source(), e.to_string()),
        }
    }
}
