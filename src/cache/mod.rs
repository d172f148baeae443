//! Cache Module
//!
//! Response cache keyed by normalized request identity, with per-route TTL,
//! lazy expiry, LRU eviction and explicit invalidation.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

use crate::clock::SharedClock;

// == TTL Classes ==
/// Freshness class of a cacheable route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Slow-changing lists and details
    Standard,
    /// Transfers, holders, live statistics
    Fresh,
}

impl TtlClass {
    pub const fn seconds(self) -> u64 {
        match self {
            TtlClass::Standard => 300,
            TtlClass::Fresh => 60,
        }
    }
}

// == Response Cache ==
/// Shared handle to the process-wide response cache.
///
/// Cloning is cheap; all clones see the same store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: Arc<RwLock<CacheStore>>,
}

impl ResponseCache {
    pub fn new(max_entries: usize, clock: SharedClock) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, clock))),
        }
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        // Write lock: lookups update LRU order, counters and lazy expiry
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: CacheKey, value: Value, ttl_seconds: u64) {
        self.store.write().await.set(key, value, ttl_seconds);
    }

    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.store.write().await.invalidate(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Sweeps expired entries; used by the background task.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}
