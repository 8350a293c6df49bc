use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://relaypulse.top/api/status";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "relaywatch/health-check";

pub const FEED_URL_VAR: &str = "RELAYWATCH_FEED_URL";
pub const TIMEOUT_VAR: &str = "RELAYWATCH_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "RELAYWATCH_USER_AGENT";

#[derive(Debug, Clone, PartialEq)]
pub struct HealthConfig {
    pub feed_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HealthConfig {
    /// Read overrides from the process environment. Call [`load_dotenv`] first
    /// to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup(FEED_URL_VAR)) {
            match Url::parse(&raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => config.feed_url = raw,
                _ => warn!(value = %raw, "Ignoring invalid {}", FEED_URL_VAR),
            }
        }

        if let Some(raw) = non_empty(lookup(TIMEOUT_VAR)) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_VAR),
            }
        }

        if let Some(raw) = non_empty(lookup(USER_AGENT_VAR)) {
            config.user_agent = raw;
        }

        config
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env");
        }
    }
}

pub fn relaywatch_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".relaywatch"))
}

pub fn default_providers_path() -> Option<PathBuf> {
    relaywatch_data_dir().map(|dir| dir.join("providers.json"))
}
