use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cache::{SnapshotCache, SnapshotResult};
use super::HealthSnapshot;
use crate::config::HealthConfig;
use crate::error::HealthError;
use crate::feed::{HealthFeedSource, HttpFeedSource};
use crate::types::health::{ProviderHealth, ServiceId};

/// Health lookups backed by one shared, lazily fetched snapshot.
pub struct HealthMonitor {
    source: Arc<dyn HealthFeedSource>,
    cache: SnapshotCache,
}

impl HealthMonitor {
    pub fn new(source: Arc<dyn HealthFeedSource>) -> Self {
        Self {
            source,
            cache: SnapshotCache::new(),
        }
    }

    pub fn from_config(config: &HealthConfig) -> Result<Self, HealthError> {
        let source = HttpFeedSource::new(config)?;
        Ok(Self::new(Arc::new(source)))
    }

    /// The aggregated snapshot. Repeated calls return the same `Arc` until the
    /// cache is invalidated.
    pub async fn fetch_all_health_status(&self) -> SnapshotResult {
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_fetch(move || async move {
                let document = source.fetch().await?;
                let entries = document.entries();
                let raw_count = entries.len();
                let snapshot = HealthSnapshot::from_entries(entries);
                info!(
                    entries = raw_count,
                    providers = snapshot.len(),
                    "Health snapshot refreshed"
                );
                Ok::<_, HealthError>(Arc::new(snapshot))
            })
            .await
    }

    /// Health of `provider` for `service`; the unknown record when the pair is
    /// missing or the feed cannot be fetched.
    pub async fn check_provider_health(
        &self,
        provider: &str,
        service: ServiceId,
    ) -> ProviderHealth {
        let snapshot = match self.fetch_all_health_status().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    provider,
                    service = %service,
                    error = %e,
                    "Health feed unavailable, reporting unknown"
                );
                return ProviderHealth::unknown();
            }
        };

        match snapshot.get(provider, service) {
            Some(health) => health.clone(),
            None => {
                debug!(provider, service = %service, "No health data for provider");
                ProviderHealth::unknown()
            }
        }
    }

    /// Drop the cached snapshot and fetch a fresh one. A fetch already in
    /// flight is awaited first rather than run alongside.
    pub async fn refresh(&self) -> SnapshotResult {
        self.cache.invalidate();
        self.fetch_all_health_status().await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn teardown(&self) {
        self.cache.teardown();
        debug!("Health monitor torn down");
    }

    pub fn cached(&self) -> Option<Arc<HealthSnapshot>> {
        self.cache.peek()
    }
}
