//! EventSubscriber port - Interface for subscribing to realtime events.
//!
//! Handlers register interest in named events and receive every matching
//! event for as long as their subscription guard is alive. Releasing the
//! guard (explicitly or by drop) unsubscribes, so a handler's lifetime is
//! tied to the view or task that owns it rather than to ambient global state.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::RealtimeEvent;

/// Handler for processing realtime events.
///
/// Implementations should be:
/// - **Quick** - handlers run inline on the channel read loop; anything
///   heavier than a cache operation should be queued elsewhere
/// - **Tolerant** - events may arrive for state that is no longer cached;
///   acting on a missing cache key is a silent no-op, not an error
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process one event.
    async fn handle(&self, event: RealtimeEvent);

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for registering event handlers.
///
/// Multiple handlers per event name are allowed (fan-out). Dispatch order
/// across handlers of one event is insertion order.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe a handler to a single event name.
    ///
    /// The returned guard unsubscribes when released or dropped.
    #[must_use = "dropping the guard immediately unsubscribes the handler"]
    fn subscribe(&self, event_name: &str, handler: Arc<dyn EventHandler>) -> SubscriptionGuard;

    /// Subscribe the same handler to several event names.
    #[must_use = "dropping the set immediately unsubscribes the handler"]
    fn subscribe_all(&self, event_names: &[&str], handler: Arc<dyn EventHandler>)
        -> SubscriptionSet;
}

/// Scoped handle for one registered handler.
///
/// Releasing is idempotent: `release()` after drop-registration teardown or
/// a second `release()` call is a no-op.
pub struct SubscriptionGuard {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Creates a guard from a disposer closure.
    ///
    /// The closure runs at most once, on the first release or on drop.
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Creates a guard that does nothing on release.
    pub fn noop() -> Self {
        Self { dispose: None }
    }

    /// Unsubscribes now instead of waiting for drop.
    pub fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }

    /// Whether the guard still holds a live subscription.
    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("active", &self.is_active())
            .finish()
    }
}

/// A bundle of subscription guards released together.
///
/// Domain sync hooks return one of these; holding it keeps every underlying
/// subscription alive, dropping it tears them all down.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    guards: Vec<SubscriptionGuard>,
}

impl SubscriptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guard to the set.
    pub fn push(&mut self, guard: SubscriptionGuard) {
        self.guards.push(guard);
    }

    /// Merges another set into this one.
    pub fn extend(&mut self, other: SubscriptionSet) {
        self.guards.extend(other.guards);
    }

    /// Releases every guard now. Idempotent.
    pub fn release(&mut self) {
        for guard in &mut self.guards {
            guard.release();
        }
        self.guards.clear();
    }

    /// Number of guards held (released guards are removed).
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the set holds no guards.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn guard_disposes_once_on_release() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut guard = SubscriptionGuard::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        guard.release();
        guard.release();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!guard.is_active());
    }

    #[test]
    fn guard_disposes_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let _guard = SubscriptionGuard::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn released_guard_does_not_dispose_again_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let mut guard = SubscriptionGuard::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
            guard.release();
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn noop_guard_is_inactive() {
        let guard = SubscriptionGuard::noop();
        assert!(!guard.is_active());
    }

    #[test]
    fn set_releases_all_guards() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut set = SubscriptionSet::new();
        for _ in 0..3 {
            let c = count.clone();
            set.push(SubscriptionGuard::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(set.len(), 3);

        set.release();

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(set.is_empty());
    }

    #[test]
    fn set_release_is_idempotent() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut set = SubscriptionSet::new();
        set.push(SubscriptionGuard::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        set.release();
        set.release();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
