use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal startup errors: the only errors that stop the process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Top-level application configuration loaded from TOML, then overlaid with
/// `OPSWATCH_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub uptime: UptimeConfig,
    #[serde(default)]
    pub datastore: DatastoreConfig,
    #[serde(default)]
    pub issues: IssuesConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
}

/// Scheduling: reporting timezone, briefing hour, quick-cycle cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_briefing_hour")]
    pub briefing_hour: u32,
    #[serde(default = "default_quick_interval")]
    pub quick_interval_secs: u64,
    /// Upper bound on a single check inside a cycle, on top of the check's
    /// own request timeouts.
    #[serde(default = "default_check_deadline")]
    pub check_deadline_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Also print briefings and alerts to the console.
    #[serde(default)]
    pub terminal: bool,
}

/// The two URL targets probed by the uptime check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeConfig {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_uptime_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_query_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_slow_query_ms")]
    pub slow_query_ms: u64,
    #[serde(default = "default_silent_days")]
    pub silent_days: u32,
    /// Must return `(name TEXT, last_active TIMESTAMPTZ NULL)` rows.
    #[serde(default = "default_activity_query")]
    pub activity_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesConfig {
    #[serde(default = "default_issues_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_query_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_deployment_api_url")]
    pub api_url: String,
    #[serde(default = "default_deployment_dashboard_url")]
    pub dashboard_url: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    /// Display name; falls back to the service id.
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_query_timeout")]
    pub timeout_secs: u64,
}

/// Optional: an unconfigured inbox check reports itself as failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_uptime_timeout")]
    pub timeout_secs: u64,
}

// --- Defaults ---

fn default_timezone() -> String {
    "UTC".into()
}

const fn default_briefing_hour() -> u32 {
    8
}

const fn default_quick_interval() -> u64 {
    15 * 60
}

const fn default_check_deadline() -> u64 {
    60
}

const fn default_uptime_timeout() -> u64 {
    10
}

const fn default_retry_delay() -> u64 {
    5
}

const fn default_query_timeout() -> u64 {
    15
}

const fn default_slow_query_ms() -> u64 {
    2000
}

const fn default_silent_days() -> u32 {
    3
}

fn default_activity_query() -> String {
    "SELECT t.name::text AS name, MAX(a.created_at) AS last_active \
     FROM targets t LEFT JOIN activity a ON a.target_id = t.id \
     GROUP BY t.name"
        .into()
}

fn default_issues_base_url() -> String {
    "https://sentry.io".into()
}

fn default_deployment_api_url() -> String {
    "https://backboard.railway.app/graphql/v2".into()
}

fn default_deployment_dashboard_url() -> String {
    "https://railway.app".into()
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            briefing_hour: default_briefing_hour(),
            quick_interval_secs: default_quick_interval(),
            check_deadline_secs: default_check_deadline(),
        }
    }
}

impl Default for UptimeConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            api_url: None,
            timeout_secs: default_uptime_timeout(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            timeout_secs: default_query_timeout(),
            slow_query_ms: default_slow_query_ms(),
            silent_days: default_silent_days(),
            activity_query: default_activity_query(),
        }
    }
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            base_url: default_issues_base_url(),
            org: None,
            project: None,
            token: None,
            timeout_secs: default_query_timeout(),
        }
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            api_url: default_deployment_api_url(),
            dashboard_url: default_deployment_dashboard_url(),
            project_id: None,
            service_id: None,
            service_name: None,
            token: None,
            timeout_secs: default_query_timeout(),
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_uptime_timeout(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from `path`, or from the default path if it exists, then
    /// apply environment overrides. Does not validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read, the TOML content
    /// is invalid, or an environment override cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::config_path() {
                Some(default_path) if default_path.exists() => Self::load_from(&default_path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("opswatch").join("config.toml"))
    }

    /// Overlay `OPSWATCH_*` variables read through `lookup`. Blank values
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable does not parse.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strings: [(&str, &mut Option<String>); 13] = [
            ("OPSWATCH_WEBHOOK_URL", &mut self.notifications.webhook_url),
            ("OPSWATCH_UPTIME_SITE_URL", &mut self.uptime.site_url),
            ("OPSWATCH_UPTIME_API_URL", &mut self.uptime.api_url),
            ("OPSWATCH_DATABASE_URL", &mut self.datastore.database_url),
            ("OPSWATCH_ISSUES_ORG", &mut self.issues.org),
            ("OPSWATCH_ISSUES_PROJECT", &mut self.issues.project),
            ("OPSWATCH_ISSUES_TOKEN", &mut self.issues.token),
            ("OPSWATCH_DEPLOY_PROJECT_ID", &mut self.deployment.project_id),
            ("OPSWATCH_DEPLOY_SERVICE_ID", &mut self.deployment.service_id),
            ("OPSWATCH_DEPLOY_SERVICE_NAME", &mut self.deployment.service_name),
            ("OPSWATCH_DEPLOY_TOKEN", &mut self.deployment.token),
            ("OPSWATCH_INBOX_URL", &mut self.inbox.url),
            ("OPSWATCH_INBOX_TOKEN", &mut self.inbox.token),
        ];
        for (key, slot) in strings {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        }

        if let Some(tz) = get("OPSWATCH_TIMEZONE") {
            self.general.timezone = tz;
        }
        if let Some(hour) = get("OPSWATCH_BRIEFING_HOUR") {
            self.general.briefing_hour = parse_number("OPSWATCH_BRIEFING_HOUR", &hour)?;
        }
        if let Some(days) = get("OPSWATCH_SILENT_DAYS") {
            self.datastore.silent_days = parse_number("OPSWATCH_SILENT_DAYS", &days)?;
        }
        Ok(())
    }

    /// Check that every required value is present and every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKeys` naming every absent required key,
    /// or `ConfigError::Invalid` for the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&str, &Option<String>); 10] = [
            ("OPSWATCH_WEBHOOK_URL", &self.notifications.webhook_url),
            ("OPSWATCH_UPTIME_SITE_URL", &self.uptime.site_url),
            ("OPSWATCH_UPTIME_API_URL", &self.uptime.api_url),
            ("OPSWATCH_DATABASE_URL", &self.datastore.database_url),
            ("OPSWATCH_ISSUES_ORG", &self.issues.org),
            ("OPSWATCH_ISSUES_PROJECT", &self.issues.project),
            ("OPSWATCH_ISSUES_TOKEN", &self.issues.token),
            ("OPSWATCH_DEPLOY_PROJECT_ID", &self.deployment.project_id),
            ("OPSWATCH_DEPLOY_SERVICE_ID", &self.deployment.service_id),
            ("OPSWATCH_DEPLOY_TOKEN", &self.deployment.token),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(key, _)| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        self.timezone()?;
        if self.general.briefing_hour > 23 {
            return Err(ConfigError::Invalid {
                key: "general.briefing_hour",
                reason: format!("{} is not an hour of the day", self.general.briefing_hour),
            });
        }
        if self.datastore.silent_days == 0 {
            return Err(ConfigError::Invalid {
                key: "datastore.silent_days",
                reason: "must be at least 1".into(),
            });
        }
        if self.general.quick_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "general.quick_interval_secs",
                reason: "must be at least 1".into(),
            });
        }
        if self.general.check_deadline_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "general.check_deadline_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Reporting timezone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the name is not an IANA timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.general
            .timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid {
                key: "general.timezone",
                reason: e.to_string(),
            })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
