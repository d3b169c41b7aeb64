//! Realtime event vocabulary.
//!
//! Inbound messages on the realtime channel are tagged with an event name
//! (`"order.status_changed"`, `"product.created"`, ...) and carry a JSON
//! payload owned by the backend. The client never interprets payloads beyond
//! extracting routing hints; the backend schema is authoritative.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use super::Timestamp;

/// Synthetic event dispatched locally after the channel reconnects.
///
/// Events missed while disconnected are never replayed, so domain bridges
/// subscribe to this name and invalidate their root cache keys to force
/// reconciliation on the next read.
pub const CHANNEL_RECONNECTED: &str = "channel.reconnected";

/// Name of a realtime event, e.g. `"order.status_changed"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventName(String);

impl EventName {
    /// Creates an event name from any string-like value.
    ///
    /// No validation is performed; routing simply never matches a name the
    /// backend does not emit.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named event received on (or synthesized for) the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    /// Event name used for subscriber routing.
    pub name: EventName,

    /// Backend-owned payload. May be `null` for signal-only events.
    pub payload: JsonValue,

    /// When the event occurred (server time if the frame carried it,
    /// otherwise local receive time).
    pub occurred_at: Timestamp,
}

impl RealtimeEvent {
    /// Creates an event stamped with the current time.
    pub fn new(name: impl Into<EventName>, payload: JsonValue) -> Self {
        Self {
            name: name.into(),
            payload,
            occurred_at: Timestamp::now(),
        }
    }

    /// Creates the synthetic reconnect event.
    pub fn reconnected() -> Self {
        Self::new(CHANNEL_RECONNECTED, JsonValue::Null)
    }

    /// Deserializes the payload into a caller-chosen shape.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Returns a string field from the payload object, if present.
    ///
    /// Bridges use this to extract routing hints (`"id"`, `"order_id"`)
    /// without committing to a payload schema.
    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(JsonValue::as_str)
    }

    /// Returns an integer field from the payload object, if present.
    pub fn payload_i64(&self, field: &str) -> Option<i64> {
        self.payload.get(field).and_then(JsonValue::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_name_compares_by_value() {
        assert_eq!(EventName::new("order.created"), EventName::from("order.created"));
        assert_ne!(EventName::new("order.created"), EventName::new("order.updated"));
    }

    #[test]
    fn payload_as_deserializes_typed_shape() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct OrderCreated {
            order_id: i64,
            status: String,
        }

        let event = RealtimeEvent::new(
            "order.created",
            json!({"order_id": 42, "status": "new"}),
        );

        let payload: OrderCreated = event.payload_as().unwrap();
        assert_eq!(payload.order_id, 42);
        assert_eq!(payload.status, "new");
    }

    #[test]
    fn payload_as_returns_error_on_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            missing: String,
        }

        let event = RealtimeEvent::new("order.created", json!({"order_id": 42}));
        let result: Result<Wrong, _> = event.payload_as();
        assert!(result.is_err());
    }

    #[test]
    fn payload_str_reads_routing_hint() {
        let event = RealtimeEvent::new("product.updated", json!({"id": "p-7", "name": "Dress"}));
        assert_eq!(event.payload_str("id"), Some("p-7"));
        assert_eq!(event.payload_str("absent"), None);
    }

    #[test]
    fn payload_i64_reads_numeric_hint() {
        let event = RealtimeEvent::new("order.created", json!({"order_id": 42}));
        assert_eq!(event.payload_i64("order_id"), Some(42));
        assert_eq!(event.payload_i64("id"), None);
    }

    #[test]
    fn payload_str_is_none_for_null_payload() {
        let event = RealtimeEvent::reconnected();
        assert_eq!(event.name.as_str(), CHANNEL_RECONNECTED);
        assert_eq!(event.payload_str("id"), None);
    }

    #[test]
    fn round_trips_through_serde() {
        let event = RealtimeEvent::new("shop.updated", json!({"id": "s-1"}));
        let json = serde_json::to_string(&event).unwrap();
        let restored: RealtimeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name, event.name);
        assert_eq!(restored.payload, event.payload);
    }
}
