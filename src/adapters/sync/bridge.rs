//! Bridge between the realtime channel and the query cache.
//!
//! An [`InvalidationBridge`] is an event handler that maps each inbound
//! event to a set of cache key prefixes and marks them stale. It never
//! fetches anything itself; refetching happens lazily when a caller next
//! reads the stale key.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::cache::{QueryCache, QueryKey};
use crate::domain::foundation::RealtimeEvent;
use crate::ports::EventHandler;

/// Routes an event to the cache key prefixes it staleness-taints.
pub type RouteFn = fn(&RealtimeEvent) -> Vec<QueryKey>;

/// Event handler that invalidates cache keys derived from the event.
pub struct InvalidationBridge {
    name: &'static str,
    cache: Arc<QueryCache>,
    routes: RouteFn,
}

impl InvalidationBridge {
    /// Creates a bridge with a fixed routing function.
    pub fn new(name: &'static str, cache: Arc<QueryCache>, routes: RouteFn) -> Self {
        Self {
            name,
            cache,
            routes,
        }
    }
}

#[async_trait]
impl EventHandler for InvalidationBridge {
    async fn handle(&self, event: RealtimeEvent) {
        for key in (self.routes)(&event) {
            let stale = self.cache.invalidate_prefix(&key);
            tracing::debug!(
                bridge = self.name,
                event = %event.name,
                key = %key,
                stale,
                "invalidated cache prefix"
            );
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
