//! Realtime channel adapters: subscription registry, connection manager,
//! reconnect policy, wire decoding, and the WebSocket/mock transports.

pub mod connection;
pub mod messages;
pub mod mock;
pub mod reconnect;
pub mod registry;
pub mod socket;

pub use connection::{ConnectOutcome, ConnectionManager};
pub use messages::WireFrame;
pub use mock::MockTransport;
pub use reconnect::BackoffPolicy;
pub use registry::SubscriptionRegistry;
pub use socket::TungsteniteTransport;
