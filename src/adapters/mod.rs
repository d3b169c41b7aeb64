//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Typed REST client for the marketplace API
//! - `cache` - In-process query cache with optimistic mutations
//! - `realtime` - WebSocket channel, subscription registry, reconnect policy
//! - `sync` - Bridges routing realtime events into cache invalidations
//! - `notify` - Notice sinks for user-facing feedback

pub mod cache;
pub mod http;
pub mod notify;
pub mod realtime;
pub mod sync;

pub use cache::{QueryCache, QueryKey};
pub use http::{ApiClient, ApiError};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use realtime::{
    BackoffPolicy, ConnectOutcome, ConnectionManager, MockTransport, SubscriptionRegistry,
    TungsteniteTransport,
};
pub use sync::InvalidationBridge;
