//! WebSocket transport backed by tokio-tungstenite.
//!
//! Credentials travel as query parameters on the connect URL, matching how
//! the marketplace backend authenticates its realtime endpoint.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::domain::session::Credentials;
use crate::ports::{RealtimeStream, RealtimeTransport, TransportError};

/// Production transport speaking WebSocket over TCP or TLS.
#[derive(Debug, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    /// Creates the transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RealtimeTransport for TungsteniteTransport {
    async fn open(
        &self,
        endpoint: &Url,
        credentials: &Credentials,
    ) -> Result<Box<dyn RealtimeStream>, TransportError> {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair("token", credentials.token.reveal())
            .append_pair("role", credentials.role.as_str());

        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(TransportError::connect)?;

        tracing::debug!(endpoint = %endpoint, "websocket opened");
        Ok(Box::new(TungsteniteStream { socket }))
    }
}

struct TungsteniteStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl RealtimeStream for TungsteniteStream {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.socket.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => {
                        tracing::warn!("skipping non-utf8 binary frame");
                        continue;
                    }
                },
                // Tungstenite answers pings itself on the next flush.
                Ok(Message::Ping(payload)) => {
                    if let Err(err) = self.socket.send(Message::Pong(payload)).await {
                        return Some(Err(TransportError::closed(err)));
                    }
                }
                Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => continue,
                Ok(Message::Close(_)) => return None,
                Err(err) => return Some(Err(TransportError::closed(err))),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(err) = self.socket.close(None).await {
            tracing::debug!(error = %err, "websocket close failed");
        }
    }
}
