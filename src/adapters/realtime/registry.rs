//! Event subscription registry.
//!
//! Routes inbound named events to zero or more registered handlers.
//! Fan-out is insertion-ordered and snapshot-based: dispatch clones the
//! handler list before invoking anything, so a handler unsubscribing
//! mid-pass (itself included) never affects delivery to the rest of that
//! pass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::domain::foundation::RealtimeEvent;
use crate::ports::{EventHandler, EventSubscriber, SubscriptionGuard, SubscriptionSet};

struct Registration {
    id: u64,
    handler: Arc<dyn EventHandler>,
}

#[derive(Default)]
struct RegistryInner {
    handlers: RwLock<HashMap<String, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl RegistryInner {
    fn remove(&self, event_name: &str, id: u64) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(list) = handlers.get_mut(event_name) {
            list.retain(|r| r.id != id);
            if list.is_empty() {
                handlers.remove(event_name);
            }
        }
    }
}

/// In-process registry mapping event names to handler lists.
///
/// Cloning shares the underlying registration table.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<RegistryInner>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one event to every handler subscribed to its name.
    ///
    /// Handlers registered for other names are untouched; an event with no
    /// subscribers is dropped silently.
    pub async fn dispatch(&self, event: RealtimeEvent) {
        let snapshot: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .inner
                .handlers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            handlers
                .get(event.name.as_str())
                .map(|list| list.iter().map(|r| Arc::clone(&r.handler)).collect())
                .unwrap_or_default()
        };

        if snapshot.is_empty() {
            tracing::trace!(event = %event.name, "no subscribers for event");
            return;
        }

        for handler in snapshot {
            tracing::trace!(event = %event.name, handler = handler.name(), "dispatching");
            handler.handle(event.clone()).await;
        }
    }

    /// Number of live registrations for an event name.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Whether no handlers are registered at all.
    pub fn is_empty(&self) -> bool {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_empty()
    }

    /// Removes every registration (connection teardown).
    ///
    /// Outstanding guards stay valid; releasing one after a clear is a
    /// no-op.
    pub fn clear(&self) {
        self.inner
            .handlers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl EventSubscriber for SubscriptionRegistry {
    fn subscribe(&self, event_name: &str, handler: Arc<dyn EventHandler>) -> SubscriptionGuard {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut handlers = self
                .inner
                .handlers
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            handlers
                .entry(event_name.to_string())
                .or_default()
                .push(Registration { id, handler });
        }

        let weak: Weak<RegistryInner> = Arc::downgrade(&self.inner);
        let name = event_name.to_string();
        SubscriptionGuard::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(&name, id);
            }
        })
    }

    fn subscribe_all(
        &self,
        event_names: &[&str],
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionSet {
        let mut set = SubscriptionSet::new();
        for name in event_names {
            set.push(self.subscribe(name, Arc::clone(&handler)));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _: RealtimeEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    fn event(name: &str) -> RealtimeEvent {
        RealtimeEvent::new(name, json!({}))
    }

    #[tokio::test]
    async fn dispatch_invokes_each_subscriber_exactly_once() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _g1 = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));
        let _g2 = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));
        let _g3 = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));

        registry.dispatch(event("order.created")).await;

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn dispatch_skips_other_event_names() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _g = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));

        registry.dispatch(event("product.created")).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unsubscribed_handler_is_not_invoked() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let mut guard = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));
        guard.release();

        registry.dispatch(event("order.created")).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(registry.handler_count("order.created"), 0);
    }

    #[tokio::test]
    async fn drop_of_guard_unsubscribes() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        {
            let _guard =
                registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));
        }

        registry.dispatch(event("order.created")).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    /// Handler that releases a sibling's guard while handling an event.
    struct UnsubscribingHandler {
        victim: Mutex<Option<SubscriptionGuard>>,
        invoked: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for UnsubscribingHandler {
        async fn handle(&self, _: RealtimeEvent) {
            self.invoked.fetch_add(1, Ordering::SeqCst);
            if let Some(mut guard) = self
                .victim
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .take()
            {
                guard.release();
            }
        }
        fn name(&self) -> &'static str {
            "UnsubscribingHandler"
        }
    }

    #[tokio::test]
    async fn unsubscribe_during_dispatch_does_not_skip_current_pass() {
        let registry = SubscriptionRegistry::new();
        let invoked = Arc::new(AtomicUsize::new(0));
        let late_count = Arc::new(AtomicUsize::new(0));

        // Third handler subscribed after the one that will remove it.
        let first = Arc::new(UnsubscribingHandler {
            victim: Mutex::new(None),
            invoked: invoked.clone(),
        });
        let _g1 = registry.subscribe("order.created", first.clone());
        let late_guard =
            registry.subscribe("order.created", Arc::new(CountingHandler(late_count.clone())));
        *first
            .victim
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(late_guard);

        registry.dispatch(event("order.created")).await;

        // The victim was unsubscribed mid-pass, but the pass snapshot still
        // delivered to it.
        assert_eq!(invoked.load(Ordering::SeqCst), 1);
        assert_eq!(late_count.load(Ordering::SeqCst), 1);

        // The next dispatch no longer reaches the removed handler.
        registry.dispatch(event("order.created")).await;
        assert_eq!(late_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn subscribe_all_registers_each_name() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _set = registry.subscribe_all(
            &["order.created", "order.status_changed", "order.cancelled"],
            Arc::new(CountingHandler(count.clone())),
        );

        registry.dispatch(event("order.created")).await;
        registry.dispatch(event("order.status_changed")).await;
        registry.dispatch(event("product.created")).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_removes_all_registrations_and_guards_stay_safe() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let mut guard = registry.subscribe("order.created", Arc::new(CountingHandler(count.clone())));
        registry.clear();

        assert!(registry.is_empty());
        registry.dispatch(event("order.created")).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Releasing after a clear is a no-op, not a panic.
        guard.release();
    }

    #[tokio::test]
    async fn insertion_order_is_preserved() {
        let registry = SubscriptionRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        struct OrderedHandler(usize, Arc<Mutex<Vec<usize>>>);

        #[async_trait]
        impl EventHandler for OrderedHandler {
            async fn handle(&self, _: RealtimeEvent) {
                self.1
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(self.0);
            }
            fn name(&self) -> &'static str {
                "OrderedHandler"
            }
        }

        let _g1 = registry.subscribe("e", Arc::new(OrderedHandler(1, order.clone())));
        let _g2 = registry.subscribe("e", Arc::new(OrderedHandler(2, order.clone())));
        let _g3 = registry.subscribe("e", Arc::new(OrderedHandler(3, order.clone())));

        registry.dispatch(event("e")).await;

        assert_eq!(
            *order
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
            vec![1, 2, 3]
        );
    }
}
