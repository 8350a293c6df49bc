use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::feed::HttpFeedSource;
use crate::health::{app_id_to_service, HealthMonitor};
use crate::identity::{self, MonitorKey};
use crate::types::health::{HealthStatus, ProviderHealth};
use crate::types::provider::ProviderRecord;

/// What the provider list shows for one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealthReport {
    pub provider_id: String,
    pub monitor_key: Option<MonitorKey>,
    /// `None` when the provider is not monitored (no badge).
    pub health: Option<ProviderHealth>,
}

pub async fn health_fetch_all(
    monitor: &HealthMonitor,
) -> Result<HashMap<String, ProviderHealth>, String> {
    let snapshot = monitor
        .fetch_all_health_status()
        .await
        .map_err(|e| e.to_string())?;
    Ok(snapshot.as_map().clone())
}

/// Health for an already-resolved monitor key.
pub async fn health_check(monitor: &HealthMonitor, provider: &str, app_id: &str) -> ProviderHealth {
    monitor
        .check_provider_health(provider, app_id_to_service(app_id))
        .await
}

pub async fn health_check_provider(
    monitor: &HealthMonitor,
    record: &ProviderRecord,
    app_id: &str,
) -> ProviderHealthReport {
    let monitor_key = identity::resolve_from_provider(record);
    let health = match monitor_key {
        Some(key) => Some(health_check(monitor, key.as_str(), app_id).await),
        None => None,
    };
    ProviderHealthReport {
        provider_id: record.id.clone(),
        monitor_key,
        health,
    }
}

/// Reports for a whole provider list, served from one snapshot.
pub async fn health_check_providers(
    monitor: &HealthMonitor,
    records: &[ProviderRecord],
    app_id: &str,
) -> Vec<ProviderHealthReport> {
    let mut reports = Vec::with_capacity(records.len());
    for record in records {
        reports.push(health_check_provider(monitor, record, app_id).await);
    }
    reports
}

/// Refetch the feed; returns the number of provider/service pairs.
pub async fn health_refresh(monitor: &HealthMonitor) -> Result<usize, String> {
    let snapshot = monitor.refresh().await.map_err(|e| e.to_string())?;
    info!(pairs = snapshot.len(), "Health refreshed on request");
    Ok(snapshot.len())
}

/// Raw feed pass-through for frontends that render it themselves.
pub async fn health_proxy_status(source: &HttpFeedSource) -> Result<Value, String> {
    source.fetch_raw().await.map_err(|e| e.to_string())
}

/// Backup provider to switch to, if the current one is down and the backup is
/// known to be healthy. Unmonitored providers never trigger a switch.
pub fn health_failover_target(
    current: &ProviderHealthReport,
    backup: Option<&ProviderHealthReport>,
) -> Option<String> {
    let current_down = current
        .health
        .as_ref()
        .is_some_and(|h| h.status == HealthStatus::Unavailable);
    if !current_down {
        return None;
    }

    let backup = backup?;
    if backup.provider_id == current.provider_id {
        return None;
    }
    backup
        .health
        .as_ref()
        .filter(|h| h.is_healthy)
        .map(|_| backup.provider_id.clone())
}
