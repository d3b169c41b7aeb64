//! Composite query keys.
//!
//! A key is an ordered list of string segments, e.g. `["products", "shop-9"]`.
//! Invalidation is hierarchical: invalidating `["products"]` marks every key
//! under that prefix stale, mirroring how list and detail queries share a
//! namespace.

use std::fmt;

/// Composite identifier for one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Single-segment key naming a domain namespace.
    pub fn root(namespace: impl Into<String>) -> Self {
        Self(vec![namespace.into()])
    }

    /// Key from explicit segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Extends the key with one more segment.
    pub fn child(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// The key's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this key equals the prefix or lies under it.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}
