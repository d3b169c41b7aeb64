//! Foundation module - Shared domain primitives.
//!
//! Contains the realtime event vocabulary, timestamps, and the error
//! taxonomy shared across the sync client.

mod errors;
mod events;
mod timestamp;

pub use errors::SyncError;
pub use events::{EventName, RealtimeEvent, CHANNEL_RECONNECTED};
pub use timestamp::Timestamp;
