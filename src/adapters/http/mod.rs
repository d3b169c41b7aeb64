//! HTTP adapter - typed REST API client.
//!
//! Wraps `reqwest` behind [`ApiClient`], normalizing the backend's two
//! response envelope shapes and bucketing failures into client/server errors.

mod client;
mod envelope;
mod error;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
