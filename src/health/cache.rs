use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use super::HealthSnapshot;
use crate::error::HealthError;

pub type SnapshotResult = Result<Arc<HealthSnapshot>, HealthError>;

type PendingFetch = Shared<BoxFuture<'static, SnapshotResult>>;

struct InFlight {
    generation: u64,
    fetch: PendingFetch,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<HealthSnapshot>>,
    pending: Option<InFlight>,
    /// Bumped by `invalidate`; fetches started under an older generation are stale.
    generation: u64,
    closed: bool,
}

/// Holds the last aggregated snapshot and coalesces concurrent fetches.
///
/// At most one fetch is outstanding at a time; every caller that arrives while
/// it runs awaits the same shared future and receives the same result. Failed
/// fetches are not cached. A fetch made stale by `invalidate` still runs to
/// completion, and the next fetch starts only once it has settled.
#[derive(Default)]
pub struct SnapshotCache {
    state: Mutex<CacheState>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, or run `fetch` (or join the fetch already
    /// in flight) and cache its successful result.
    ///
    /// The future returned by `fetch` is not polled until any stale fetch has
    /// settled.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> SnapshotResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SnapshotResult> + Send + 'static,
    {
        let (pending, generation) = {
            let mut state = self.lock();
            if state.closed {
                return Err(HealthError::Closed);
            }
            if let Some(snapshot) = &state.snapshot {
                debug!("Health snapshot cache hit");
                return Ok(Arc::clone(snapshot));
            }
            let generation = state.generation;
            let inflight = state
                .pending
                .as_ref()
                .map(|inflight| (inflight.generation, inflight.fetch.clone()));
            match inflight {
                Some((started, shared)) if started == generation => {
                    debug!("Joining in-flight health fetch");
                    (shared, generation)
                }
                stale => {
                    let previous = stale.map(|(_, shared)| shared);
                    if previous.is_some() {
                        debug!("Queueing health fetch behind a stale one");
                    } else {
                        debug!("Health snapshot cache miss, starting fetch");
                    }
                    let next = fetch();
                    let pending = async move {
                        if let Some(previous) = previous {
                            let _ = previous.await;
                        }
                        next.await
                    }
                    .boxed()
                    .shared();
                    state.pending = Some(InFlight {
                        generation,
                        fetch: pending.clone(),
                    });
                    (pending, generation)
                }
            }
        };

        let result = pending.clone().await;

        let mut state = self.lock();
        if state
            .pending
            .as_ref()
            .is_some_and(|inflight| inflight.fetch.ptr_eq(&pending))
        {
            state.pending = None;
        }
        // A fetch that finished after an invalidate() is delivered but not stored.
        if generation == state.generation && !state.closed {
            if let Ok(snapshot) = &result {
                state.snapshot = Some(Arc::clone(snapshot));
            }
        }
        result
    }

    /// Cached snapshot without triggering a fetch.
    pub fn peek(&self) -> Option<Arc<HealthSnapshot>> {
        self.lock().snapshot.clone()
    }

    /// Drop the cached snapshot and mark any in-flight fetch stale.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.snapshot = None;
        state.generation += 1;
        debug!(generation = state.generation, "Health snapshot cache invalidated");
    }

    /// Drop all state and refuse further fetches.
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.snapshot = None;
        state.pending = None;
        state.closed = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
