//! Domain layer containing the vocabulary of the sync client.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (events, timestamps, errors)
//! - `session` - Session identity (roles, shop gating, credentials)

pub mod foundation;
pub mod session;
