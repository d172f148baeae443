//! LRU Tracker Module
//!
//! Recency ordering used to pick eviction victims when the cache is full.

use std::collections::{BTreeMap, HashMap};

use super::CacheKey;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a fresh sequence number; the smallest
/// stamp is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Sequence number -> key, oldest first
    order: BTreeMap<u64, CacheKey>,
    /// Key -> its current sequence number
    stamps: HashMap<CacheKey, u64>,
    next_stamp: u64,
}

impl LruTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &CacheKey) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        if let Some(previous) = self.stamps.insert(key.clone(), stamp) {
            self.order.remove(&previous);
        }
        self.order.insert(stamp, key.clone());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &CacheKey) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<CacheKey> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> CacheKey {
        CacheKey::from(raw)
    }

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
    }

    #[test]
    fn test_lru_evicts_in_insertion_order() {
        let mut lru = LruTracker::new();
        lru.touch(&key("/a"));
        lru.touch(&key("/b"));
        lru.touch(&key("/c"));

        assert_eq!(lru.evict_oldest(), Some(key("/a")));
        assert_eq!(lru.evict_oldest(), Some(key("/b")));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_touch_moves_to_front() {
        let mut lru = LruTracker::new();
        lru.touch(&key("/a"));
        lru.touch(&key("/b"));
        lru.touch(&key("/c"));

        lru.touch(&key("/a"));

        assert_eq!(lru.evict_oldest(), Some(key("/b")));
        assert_eq!(lru.evict_oldest(), Some(key("/c")));
        assert_eq!(lru.evict_oldest(), Some(key("/a")));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruTracker::new();
        lru.touch(&key("/a"));
        lru.touch(&key("/a"));
        lru.touch(&key("/a"));

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest(), Some(key("/a")));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();
        lru.touch(&key("/a"));
        lru.touch(&key("/b"));

        lru.remove(&key("/a"));
        lru.remove(&key("/missing"));

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest(), Some(key("/b")));
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();
        lru.touch(&key("/a"));
        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }
}
