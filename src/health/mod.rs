//! Reduces raw per-channel feed entries to one health record per
//! provider/service pair.

pub mod cache;
pub mod monitor;

use std::collections::HashMap;

use serde::Serialize;

use crate::types::feed::{RawHealthEntry, TimelinePoint};
use crate::types::health::{HealthStatus, ProviderHealth, ServiceId};

pub use cache::SnapshotCache;
pub use monitor::HealthMonitor;

pub fn status_to_health(status: i64) -> HealthStatus {
    match status {
        1 => HealthStatus::Available,
        2 => HealthStatus::Degraded,
        0 => HealthStatus::Unavailable,
        _ => HealthStatus::Unknown,
    }
}

/// Mean of the non-negative availability samples, `None` when there are none.
pub fn calculate_availability(timeline: &[TimelinePoint]) -> Option<f64> {
    let (sum, count) = timeline
        .iter()
        .filter_map(|point| point.availability)
        .filter(|value| *value >= 0.0)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn build_health(entry: &RawHealthEntry) -> ProviderHealth {
    let current = entry.current_status.clone().unwrap_or_default();
    let status = current
        .status
        .map(status_to_health)
        .unwrap_or(HealthStatus::Unknown);

    ProviderHealth {
        is_healthy: status == HealthStatus::Available,
        status,
        latency: current.latency.unwrap_or(0.0),
        last_checked: current.timestamp.map(|secs| secs.saturating_mul(1000)),
        availability: calculate_availability(&entry.timeline),
    }
}

/// Worst-case envelope of two observations of the same provider/service.
///
/// Commutative and associative, so channel order in the feed does not matter.
pub fn merge_health(existing: Option<ProviderHealth>, incoming: ProviderHealth) -> ProviderHealth {
    let Some(existing) = existing else {
        return incoming;
    };

    let availability = match (existing.availability, incoming.availability) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    ProviderHealth {
        is_healthy: existing.is_healthy && incoming.is_healthy,
        status: existing.status.worst(incoming.status),
        latency: existing.latency.max(incoming.latency),
        last_checked: existing.last_checked.max(incoming.last_checked),
        availability,
    }
}

pub fn health_key(provider: &str, service: &str) -> String {
    format!("{}/{}", provider, service)
}

/// Static app id -> service mapping. Unrecognised apps default to `cc`.
pub fn app_id_to_service(app_id: &str) -> ServiceId {
    match app_id {
        "claude" | "gemini" => ServiceId::Cc,
        "codex" => ServiceId::Cx,
        _ => ServiceId::Cc,
    }
}

/// Aggregated health keyed by `"provider/service"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HealthSnapshot {
    entries: HashMap<String, ProviderHealth>,
}

impl HealthSnapshot {
    /// Group entries by provider and service (channel is ignored) and fold
    /// each group with [`merge_health`].
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RawHealthEntry>,
    {
        let mut grouped: HashMap<String, ProviderHealth> = HashMap::new();
        for entry in entries {
            let key = health_key(&entry.provider, &entry.service);
            let merged = merge_health(grouped.remove(&key), build_health(&entry));
            grouped.insert(key, merged);
        }
        Self { entries: grouped }
    }

    pub fn get(&self, provider: &str, service: ServiceId) -> Option<&ProviderHealth> {
        self.entries.get(&health_key(provider, service.as_str()))
    }

    pub fn get_key(&self, key: &str) -> Option<&ProviderHealth> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, ProviderHealth> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::feed::CurrentStatus;

    fn entry(
        provider: &str,
        service: &str,
        channel: Option<&str>,
        status: i64,
        latency: f64,
        timestamp: i64,
        availability: &[f64],
    ) -> RawHealthEntry {
        RawHealthEntry {
            provider: provider.to_string(),
            provider_url: format!("https://{}.com", provider),
            service: service.to_string(),
            channel: channel.map(str::to_string),
            category: "third_party".to_string(),
            current_status: Some(CurrentStatus {
                status: Some(status),
                latency: Some(latency),
                timestamp: Some(timestamp),
            }),
            timeline: availability.iter().copied().map(TimelinePoint::new).collect(),
        }
    }

    fn health(
        status: HealthStatus,
        latency: f64,
        last_checked: i64,
        availability: Option<f64>,
    ) -> ProviderHealth {
        ProviderHealth {
            is_healthy: status == HealthStatus::Available,
            status,
            latency,
            last_checked: Some(last_checked),
            availability,
        }
    }

    #[test]
    fn status_codes_map_to_health() {
        assert_eq!(status_to_health(1), HealthStatus::Available);
        assert_eq!(status_to_health(2), HealthStatus::Degraded);
        assert_eq!(status_to_health(0), HealthStatus::Unavailable);
        for other in [-1, 3, 99, i64::MIN, i64::MAX] {
            assert_eq!(status_to_health(other), HealthStatus::Unknown);
        }
    }

    #[test]
    fn availability_averages_valid_samples() {
        let points = |values: &[f64]| {
            values
                .iter()
                .copied()
                .map(TimelinePoint::new)
                .collect::<Vec<_>>()
        };
        assert_eq!(calculate_availability(&points(&[100.0, 80.0])), Some(90.0));
        assert_eq!(calculate_availability(&points(&[-1.0, 100.0, -5.0, 50.0])), Some(75.0));
        assert_eq!(calculate_availability(&points(&[0.0])), Some(0.0));
        assert_eq!(calculate_availability(&points(&[-1.0, -5.0])), None);
        assert_eq!(calculate_availability(&[]), None);
    }

    #[test]
    fn availability_ignores_missing_samples() {
        let points = vec![TimelinePoint::default(), TimelinePoint::new(60.0)];
        assert_eq!(calculate_availability(&points), Some(60.0));
    }

    #[test]
    fn build_health_converts_units() {
        let e = entry("88code", "cc", None, 1, 120.0, 1_710_000_000, &[100.0, 80.0]);
        assert_eq!(
            build_health(&e),
            ProviderHealth {
                is_healthy: true,
                status: HealthStatus::Available,
                latency: 120.0,
                last_checked: Some(1_710_000_000_000),
                availability: Some(90.0),
            }
        );
    }

    #[test]
    fn degraded_is_not_healthy() {
        let e = entry("duckcoding", "cx", None, 2, 88.0, 1_710_000_200, &[70.0, 90.0]);
        let h = build_health(&e);
        assert_eq!(h.status, HealthStatus::Degraded);
        assert!(!h.is_healthy);
        assert_eq!(h.availability, Some(80.0));
    }

    #[test]
    fn build_health_without_current_status() {
        let mut e = entry("xyai", "cc", None, 1, 0.0, 0, &[]);
        e.current_status = None;
        let h = build_health(&e);
        assert_eq!(h, ProviderHealth::unknown());
    }

    #[test]
    fn merge_with_nothing_returns_incoming() {
        let incoming = health(HealthStatus::Available, 100.0, 1000, Some(95.0));
        assert_eq!(merge_health(None, incoming.clone()), incoming);
    }

    #[test]
    fn merge_takes_worst_case() {
        let available = health(HealthStatus::Available, 100.0, 1000, Some(95.0));
        let unavailable = health(HealthStatus::Unavailable, 50.0, 2000, Some(10.0));

        let merged = merge_health(Some(available), unavailable);
        assert_eq!(merged.status, HealthStatus::Unavailable);
        assert!(!merged.is_healthy);
        assert_eq!(merged.availability, Some(10.0));
        assert_eq!(merged.latency, 100.0);
        assert_eq!(merged.last_checked, Some(2000));
    }

    #[test]
    fn merge_ignores_absent_availability() {
        let a = health(HealthStatus::Degraded, 10.0, 1, None);
        let b = health(HealthStatus::Available, 20.0, 2, Some(70.0));
        assert_eq!(merge_health(Some(a.clone()), b.clone()).availability, Some(70.0));
        assert_eq!(merge_health(Some(b), a.clone()).availability, Some(70.0));
        assert_eq!(merge_health(Some(a.clone()), a).availability, None);
    }

    #[test]
    fn merge_is_order_independent() {
        let samples = [
            health(HealthStatus::Available, 100.0, 1000, Some(95.0)),
            health(HealthStatus::Degraded, 300.0, 3000, None),
            health(HealthStatus::Unknown, 0.0, 500, Some(40.0)),
            health(HealthStatus::Unavailable, 50.0, 2000, Some(10.0)),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(
                    merge_health(Some(a.clone()), b.clone()),
                    merge_health(Some(b.clone()), a.clone())
                );
                for c in &samples {
                    let ab = merge_health(Some(a.clone()), b.clone());
                    let left = merge_health(Some(ab), c.clone());
                    let bc = merge_health(Some(b.clone()), c.clone());
                    let right = merge_health(Some(a.clone()), bc);
                    assert_eq!(left, right);
                    assert!(left.status.severity() >= a.status.severity().max(b.status.severity()));
                }
            }
        }
    }

    #[test]
    fn unknown_channel_dominates_merge() {
        let merged = merge_health(
            Some(health(HealthStatus::Unavailable, 10.0, 1, Some(0.0))),
            ProviderHealth::unknown(),
        );
        assert_eq!(merged.status, HealthStatus::Unknown);
        assert_eq!(merged.last_checked, Some(1));
    }

    #[test]
    fn channels_fold_into_one_record() {
        let vip3 = entry("88code", "cc", Some("vip3"), 0, 500.0, 1_710_000_000, &[0.0]);
        let vip5 = entry("88code", "cc", Some("vip5"), 1, 100.0, 1_710_000_100, &[99.0]);

        let forward = HealthSnapshot::from_entries(vec![vip3.clone(), vip5.clone()]);
        let backward = HealthSnapshot::from_entries(vec![vip5.clone(), vip3.clone()]);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 1);

        let h = forward.get("88code", ServiceId::Cc).unwrap();
        assert_eq!(h.status, HealthStatus::Unavailable);
        assert!(!h.is_healthy);
        assert_eq!(h.latency, 500.0);
        assert_eq!(h.availability, Some(0.0));
        assert_eq!(h.last_checked, Some(1_710_000_100_000));
        assert_eq!(*h, merge_health(Some(build_health(&vip3)), build_health(&vip5)));
    }

    #[test]
    fn services_stay_separate() {
        let snapshot = HealthSnapshot::from_entries(vec![
            entry("duckcoding", "cc", None, 1, 50.0, 1, &[]),
            entry("duckcoding", "cx", None, 0, 999.0, 2, &[]),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.get("duckcoding", ServiceId::Cc).unwrap().status,
            HealthStatus::Available
        );
        assert_eq!(snapshot.get_key("duckcoding/cx").unwrap().status, HealthStatus::Unavailable);
        assert!(snapshot.get("duckcoding", ServiceId::Cx).unwrap().availability.is_none());
    }

    #[test]
    fn app_ids_map_to_services() {
        assert_eq!(app_id_to_service("claude"), ServiceId::Cc);
        assert_eq!(app_id_to_service("codex"), ServiceId::Cx);
        assert_eq!(app_id_to_service("gemini"), ServiceId::Cc);
        assert_eq!(app_id_to_service("unknown"), ServiceId::Cc);
    }
}
