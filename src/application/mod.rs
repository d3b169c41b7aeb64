//! Application layer - the session facade.
//!
//! This layer wires configuration, transport, cache and registry into one
//! [`SyncSession`] per authenticated principal.

pub mod session;

pub use session::SyncSession;
