//! In-memory TTL cache shared by the remote and relational stores.
//!
//! Entries expire a fixed time after insertion. Expired entries are never
//! returned; they are physically removed by a sweep, which runs on insert at
//! most once per sweep interval (or on demand via [`TtlCache::sweep`]).
//!
//! The map sits behind a reader/writer lock so concurrent lookups can read
//! while another task populates an entry. Duplicate population of the same
//! key is last-writer-wins.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::config::{CACHE_SWEEP_INTERVAL, CACHE_TTL};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    last_sweep: Instant,
}

/// A string-keyed cache with per-entry expiry.
pub struct TtlCache<V> {
    ttl: Duration,
    sweep_interval: Duration,
    state: RwLock<CacheState<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache with the default 30s TTL and 60s sweep interval.
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL, CACHE_SWEEP_INTERVAL)
    }

    /// Creates a cache with custom lifetimes.
    ///
    /// # Arguments
    ///
    /// * `ttl` - How long an entry stays valid after insertion
    /// * `sweep_interval` - Minimum time between two automatic sweeps
    pub fn with_ttl(ttl: Duration, sweep_interval: Duration) -> Self {
        TtlCache {
            ttl,
            sweep_interval,
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let now = Instant::now();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );

        if now.duration_since(state.last_sweep) >= self.sweep_interval {
            let before = state.entries.len();
            state.entries.retain(|_, entry| entry.expires_at > now);
            state.last_sweep = now;
            log::trace!(
                "Cache sweep removed {} expired entries",
                before - state.entries.len()
            );
        }
    }

    /// Removes every expired entry. Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.expires_at > now);
        state.last_sweep = now;
        before - state.entries.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
