//! Cache Store Module
//!
//! Single-threaded cache engine: HashMap storage, LRU tracking, lazy TTL expiry.
//! [`super::ResponseCache`] wraps it for shared async access.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::clock::SharedClock;

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    /// Capacity bound; the least recently used entry goes first
    max_entries: usize,
    clock: SharedClock,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` responses (minimum 1).
    pub fn new(max_entries: usize, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Overwrites reset the TTL. A new key at capacity evicts the least
    /// recently used entry.
    pub fn set(&mut self, key: CacheKey, value: Value, ttl_seconds: u64) {
        let now = self.clock.now_ms();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                tracing::debug!(key = %evicted, "evicted least recently used response");
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, now, ttl_seconds));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a clone of the cached value if present and fresh.
    ///
    /// Expired entries are removed on the spot and count as misses.
    pub fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Invalidate ==
    /// Drops one key. Returns whether it was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Drops every entry. Counters other than the entry count survive.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }
        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}
