//! Per-viewer feed cache with subscription-driven invalidation.

use doc_store::SubscriptionRouter;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::RankedFeed;

/// Cached ranked feeds, one per viewer.
///
/// Change events carry no payload, so any changed document drops every
/// cached feed: entries are re-derived on the next request, never
/// patched in place.
#[derive(Clone, Default)]
pub struct FeedCache {
    inner: Arc<Mutex<HashMap<Uuid, RankedFeed>>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, viewer_id: Uuid) -> Option<RankedFeed> {
        self.entries().get(&viewer_id).cloned()
    }

    pub fn insert(&self, feed: RankedFeed) {
        self.entries().insert(feed.viewer_id, feed);
    }

    pub fn invalidate_all(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, RankedFeed>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawn a task that drops cached feeds whenever the store reports a
/// changed document. A lagged subscription also clears the cache: a
/// gap in the stream means any entry could be stale.
pub fn spawn_invalidator(cache: FeedCache, router: &SubscriptionRouter) -> JoinHandle<()> {
    let mut rx = router.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!(key = %event.key, "document changed, invalidating cached feeds");
                    cache.invalidate_all();
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "change stream lagged, invalidating cached feeds");
                    cache.invalidate_all();
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
