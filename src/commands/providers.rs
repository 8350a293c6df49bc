use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::identity::{self, MonitorKey};
use crate::types::provider::ProviderRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum ProviderFile {
    List(Vec<ProviderRecord>),
    ById(BTreeMap<String, ProviderRecord>),
}

/// Read providers from a JSON file holding either an array of records or an
/// object keyed by provider id.
pub fn providers_load(path: &Path) -> Result<Vec<ProviderRecord>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file: ProviderFile = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let records = match file {
        ProviderFile::List(records) => records,
        ProviderFile::ById(map) => map.into_values().collect(),
    };
    debug!(count = records.len(), path = %path.display(), "Loaded providers");
    Ok(records)
}

pub fn provider_monitor_key(record: &ProviderRecord) -> Option<MonitorKey> {
    identity::resolve_from_provider(record)
}

/// Ids of the providers the health feed reports on, in input order.
pub fn providers_monitored(records: &[ProviderRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| identity::is_monitored(record))
        .map(|record| record.id.clone())
        .collect()
}
