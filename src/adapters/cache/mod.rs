//! Cache adapter - the client-side query cache.

mod key;
mod query_cache;

pub use key::QueryKey;
pub use query_cache::QueryCache;
