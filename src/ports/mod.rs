//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventHandler` - Handler that processes incoming realtime events
//! - `EventSubscriber` - Port for registering handlers against event names
//! - `SubscriptionGuard` / `SubscriptionSet` - Scoped subscription handles
//!
//! ## Channel Ports
//!
//! - `RealtimeTransport` / `RealtimeStream` - The live socket, abstracted so
//!   tests run against an in-memory channel
//!
//! ## Presentation Ports
//!
//! - `Notifier` - Transient user-facing notices (toasts)

mod event_subscriber;
mod notifier;
mod transport;

pub use event_subscriber::{EventHandler, EventSubscriber, SubscriptionGuard, SubscriptionSet};
pub use notifier::{Notice, Notifier, Severity};
pub use transport::{RealtimeStream, RealtimeTransport, TransportError};
