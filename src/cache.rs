//! Lazily populated, concurrency-safe snapshot cache
//!
//! [`SnapshotCache`] is the single source of truth for "the current host
//! snapshot". Population is lazy and single-flight: at most one
//! [`HostInfoSource::collect`] call is in flight per cache, every request that
//! arrives while it runs shares its outcome, and once a snapshot is published
//! reads are lock-free and never touch the source again. Failed attempts are
//! not cached, so a transient OS hiccup never wedges the endpoint.

use arc_swap::ArcSwapOption;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::collector::HostInfoSource;
use crate::error::CollectError;
use crate::info::InfoSnapshot;

type CollectAttempt = Shared<BoxFuture<'static, Result<Arc<InfoSnapshot>, CollectError>>>;

pub struct SnapshotCache {
    source: Arc<dyn HostInfoSource>,
    /// Published snapshot. `None` until the first successful collection.
    current: ArcSwapOption<InfoSnapshot>,
    /// The collection attempt currently in flight, if any. Guards the
    /// Empty → Populating transition; never held across an await.
    inflight: Mutex<Option<CollectAttempt>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn HostInfoSource>) -> Self {
        Self {
            source,
            current: ArcSwapOption::const_empty(),
            inflight: Mutex::new(None),
        }
    }

    /// Return the cached snapshot, collecting it first if necessary.
    ///
    /// Callers that find the cache populated return immediately. Callers that
    /// find it empty either start a collection or join the one already in
    /// flight, and all of them receive that attempt's result — the snapshot on
    /// success, the attempt's error on failure. An error leaves the cache
    /// empty so the next request retries from scratch.
    pub async fn get(&self) -> Result<Arc<InfoSnapshot>, CollectError> {
        if let Some(snapshot) = self.current.load_full() {
            return Ok(snapshot);
        }

        let attempt = {
            let mut inflight = self.inflight.lock().expect("snapshot cache lock poisoned");
            // Re-check under the lock: another request may have published
            // between our fast-path miss and acquiring the lock.
            if let Some(snapshot) = self.current.load_full() {
                return Ok(snapshot);
            }
            match inflight.as_ref() {
                Some(attempt) => {
                    debug!("joining in-flight host info collection");
                    attempt.clone()
                }
                None => {
                    debug!("starting host info collection");
                    let source = Arc::clone(&self.source);
                    let attempt = async move { source.collect().await.map(Arc::new) }
                        .boxed()
                        .shared();
                    *inflight = Some(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        // First caller to resolve this attempt retires it; on success that
        // same caller publishes the snapshot. The ptr_eq guard keeps a slow
        // finisher from retiring a newer attempt started after a failure.
        {
            let mut inflight = self.inflight.lock().expect("snapshot cache lock poisoned");
            if inflight.as_ref().is_some_and(|a| a.ptr_eq(&attempt)) {
                *inflight = None;
                if let Ok(snapshot) = &result {
                    self.current.store(Some(Arc::clone(snapshot)));
                    info!(hostname = %snapshot.hostname, "host info snapshot cached");
                }
            }
        }

        result
    }

    /// Whether a snapshot has been published yet.
    pub fn is_populated(&self) -> bool {
        self.current.load().is_some()
    }
}
