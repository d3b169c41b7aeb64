//! Bazar Sync - Realtime Cache Synchronization Client
//!
//! This crate keeps a local query cache in step with a multi-tenant
//! marketplace backend: a WebSocket channel delivers named events, a
//! subscription registry fans them out, and invalidation bridges mark the
//! affected cache keys stale so the next read refetches over REST.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
