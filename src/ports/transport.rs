//! RealtimeTransport port - Interface over the live socket.
//!
//! The connection manager never touches a concrete WebSocket library; it
//! opens streams through this port. Production uses the tungstenite adapter,
//! tests use an in-memory channel transport.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::domain::session::Credentials;

/// Errors raised by the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel could not be opened (refused, DNS, TLS, handshake).
    #[error("failed to open realtime channel: {0}")]
    Connect(String),

    /// The channel broke after being established.
    #[error("realtime channel closed: {0}")]
    Closed(String),
}

impl TransportError {
    /// Creates a connect error from any displayable cause.
    pub fn connect(cause: impl std::fmt::Display) -> Self {
        TransportError::Connect(cause.to_string())
    }

    /// Creates a closed error from any displayable cause.
    pub fn closed(cause: impl std::fmt::Display) -> Self {
        TransportError::Closed(cause.to_string())
    }
}

/// Factory for live realtime streams.
///
/// `open` authenticates with the session credentials; how they travel
/// (query parameters, headers) is the adapter's concern.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Opens one stream against the given endpoint.
    async fn open(
        &self,
        endpoint: &Url,
        credentials: &Credentials,
    ) -> Result<Box<dyn RealtimeStream>, TransportError>;
}

/// One live, ordered stream of text frames.
#[async_trait]
pub trait RealtimeStream: Send {
    /// Next text frame from the peer.
    ///
    /// Returns `None` when the peer closed the channel cleanly, and
    /// `Some(Err(_))` when it broke. Control frames are handled inside the
    /// adapter and never surface here.
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;

    /// Closes the stream. Safe to call more than once.
    async fn close(&mut self);
}
