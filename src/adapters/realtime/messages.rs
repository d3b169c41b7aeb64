//! Wire frame decoding for the realtime channel.
//!
//! Inbound frames are JSON objects tagged with a `type` field naming the
//! event. Payload and timestamp are optional; unknown fields are ignored so
//! the backend can evolve its schema without breaking older clients.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::domain::foundation::{RealtimeEvent, Timestamp};

/// One decoded inbound frame.
#[derive(Debug, Deserialize)]
pub struct WireFrame {
    /// Event name, e.g. `"kaspi.order.status_changed"`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event payload; `null` when the frame is a bare signal.
    #[serde(default)]
    pub payload: JsonValue,

    /// Server-side event time, when the backend includes it.
    #[serde(default)]
    pub occurred_at: Option<Timestamp>,
}

impl WireFrame {
    /// Decodes a raw text frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Converts the frame into a routable event.
    ///
    /// Frames without a timestamp are stamped with local receive time.
    pub fn into_event(self) -> RealtimeEvent {
        RealtimeEvent {
            name: self.event_type.as_str().into(),
            payload: self.payload,
            occurred_at: self.occurred_at.unwrap_or_else(Timestamp::now),
        }
    }
}
