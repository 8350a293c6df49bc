//! Maps loosely specified provider records onto monitored provider keys.

pub mod mapping;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::normalize::{normalize_host, normalize_name};
use crate::types::provider::ProviderRecord;

/// `base_url = "..."` assignment inside a free-text client config.
static BASE_URL_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)(?:^|[\s{,])base_url\s*=\s*["']([^"'\r\n]+)["']"#)
        .expect("Invalid base_url regex")
});

/// Canonical key of a provider the monitoring feed reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MonitorKey(&'static str);

impl MonitorKey {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MonitorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<&str> for MonitorKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single way of recognising a provider.
pub type Strategy = fn(&ProviderRecord) -> Option<MonitorKey>;

/// Resolution order. The first strategy that yields a key wins.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("name", by_name),
    ("env", by_env_base_url),
    ("config", by_config_base_url),
    ("website", by_website_url),
];

pub fn resolve_by_name(name: &str) -> Option<MonitorKey> {
    mapping::lookup_name(&normalize_name(name)).map(MonitorKey)
}

pub fn resolve_by_url(url: &str) -> Option<MonitorKey> {
    match normalize_host(url) {
        Ok(host) => mapping::lookup_domain(&host).map(MonitorKey),
        Err(e) => {
            debug!(error = %e, "URL not usable for provider matching");
            None
        }
    }
}

pub fn resolve_from_provider(record: &ProviderRecord) -> Option<MonitorKey> {
    STRATEGIES.iter().find_map(|(label, strategy)| {
        let key = strategy(record)?;
        debug!(
            provider_id = %record.id,
            strategy = *label,
            key = %key,
            "Resolved monitored provider"
        );
        Some(key)
    })
}

pub fn is_monitored(record: &ProviderRecord) -> bool {
    resolve_from_provider(record).is_some()
}

/// First `base_url` assignment in `config`, if any.
pub fn extract_base_url(config: &str) -> Option<&str> {
    BASE_URL_ASSIGNMENT
        .captures(config)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn by_name(record: &ProviderRecord) -> Option<MonitorKey> {
    resolve_by_name(&record.name)
}

fn by_env_base_url(record: &ProviderRecord) -> Option<MonitorKey> {
    record
        .env()?
        .values()
        .filter(|value| value.contains("http"))
        .find_map(|value| resolve_by_url(value))
}

fn by_config_base_url(record: &ProviderRecord) -> Option<MonitorKey> {
    extract_base_url(record.config_text()?).and_then(resolve_by_url)
}

fn by_website_url(record: &ProviderRecord) -> Option<MonitorKey> {
    resolve_by_url(record.website_url.as_deref()?)
}
