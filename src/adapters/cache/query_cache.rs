//! Client-side query cache with invalidation and optimistic mutations.
//!
//! Entries hold the last fetched value for a [`QueryKey`] plus a freshness
//! flag. Invalidation marks an entry stale so the next read refetches;
//! invalidating an absent key is a silent no-op.
//!
//! Every key carries a generation counter used to cancel outstanding
//! refetches: an optimistic mutation bumps the generation before patching,
//! and a refetch that started under an older generation discards its result
//! instead of overwriting the optimistic value.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use crate::ports::{Notice, Notifier};

use super::key::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone)]
struct Entry {
    value: JsonValue,
    freshness: Freshness,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    generations: HashMap<QueryKey, u64>,
}

/// Shared cache of fetched server data, keyed by composite query keys.
///
/// The cache is the only shared mutable state in the client; all access
/// goes through short non-async critical sections, never held across awaits.
#[derive(Default)]
pub struct QueryCache {
    state: RwLock<CacheState>,
}

impl QueryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for a key, fresh or stale.
    ///
    /// This is what a view renders; staleness only controls refetching.
    pub fn peek(&self, key: &QueryKey) -> Option<JsonValue> {
        self.read().entries.get(key).map(|e| e.value.clone())
    }

    /// Whether a read of this key should refetch. Missing keys are stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.read()
            .entries
            .get(key)
            .map_or(true, |e| e.freshness == Freshness::Stale)
    }

    /// Stores a fresh value, superseding any in-flight refetch.
    pub fn set(&self, key: QueryKey, value: JsonValue) {
        let mut state = self.write();
        *state.generations.entry(key.clone()).or_insert(0) += 1;
        state.entries.insert(
            key,
            Entry {
                value,
                freshness: Freshness::Fresh,
            },
        );
    }

    /// Marks one key stale. Absent key: silent no-op.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut state = self.write();
        if let Some(entry) = state.entries.get_mut(key) {
            entry.freshness = Freshness::Stale;
        }
    }

    /// Marks every key at or under the prefix stale.
    ///
    /// Returns the number of entries touched (0 when nothing matched).
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut state = self.write();
        let mut touched = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.freshness = Freshness::Stale;
                touched += 1;
            }
        }
        touched
    }

    /// Drops an entry entirely.
    pub fn remove(&self, key: &QueryKey) {
        self.write().entries.remove(key);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Drops all entries (session teardown).
    pub fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        state.generations.clear();
    }

    /// Read-through fetch: returns the cached value when fresh, otherwise
    /// runs `fetcher` and stores the result.
    ///
    /// If a mutation bumps the key's generation while the fetch is in
    /// flight, the fetched value is discarded and the current cache value
    /// (the optimistic one) is returned instead.
    pub async fn fetch<F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> Result<JsonValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<JsonValue, E>>,
    {
        let started_generation = {
            let state = self.read();
            if let Some(entry) = state.entries.get(key) {
                if entry.freshness == Freshness::Fresh {
                    return Ok(entry.value.clone());
                }
            }
            state.generations.get(key).copied().unwrap_or(0)
        };

        let fetched = fetcher().await?;

        let mut state = self.write();
        let current = state.generations.get(key).copied().unwrap_or(0);
        if current == started_generation {
            state.entries.insert(
                key.clone(),
                Entry {
                    value: fetched.clone(),
                    freshness: Freshness::Fresh,
                },
            );
            Ok(fetched)
        } else {
            tracing::debug!(key = %key, "discarding superseded refetch");
            Ok(state
                .entries
                .get(key)
                .map(|e| e.value.clone())
                .unwrap_or(fetched))
        }
    }

    /// Runs an optimistic mutation against one key.
    ///
    /// Protocol:
    /// 1. Bump the key's generation (cancels outstanding refetches).
    /// 2. Snapshot the current entry, apply `patch`, store the result fresh
    ///    so it renders immediately.
    /// 3. Await `commit` (the server round-trip).
    /// 4. On success, mark the key stale so the next read reconciles with
    ///    the server. On failure, restore the snapshot verbatim and emit an
    ///    error notice.
    pub async fn run_optimistic<Fut, T, E>(
        &self,
        key: &QueryKey,
        notifier: &dyn Notifier,
        patch: impl FnOnce(Option<&JsonValue>) -> JsonValue,
        commit: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let previous = {
            let mut state = self.write();
            *state.generations.entry(key.clone()).or_insert(0) += 1;
            let previous = state.entries.get(key).cloned();
            let patched = patch(previous.as_ref().map(|e| &e.value));
            state.entries.insert(
                key.clone(),
                Entry {
                    value: patched,
                    freshness: Freshness::Fresh,
                },
            );
            previous
        };

        match commit.await {
            Ok(confirmed) => {
                self.invalidate(key);
                Ok(confirmed)
            }
            Err(err) => {
                {
                    let mut state = self.write();
                    *state.generations.entry(key.clone()).or_insert(0) += 1;
                    match previous {
                        Some(entry) => {
                            state.entries.insert(key.clone(), entry);
                        }
                        None => {
                            state.entries.remove(key);
                        }
                    }
                }
                tracing::warn!(key = %key, error = %err, "optimistic mutation rolled back");
                notifier.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
