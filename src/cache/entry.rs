//! Cache Entry Module
//!
//! A cached JSON response plus the bookkeeping needed for TTL expiry.

use serde_json::Value;

// == Cache Entry ==
/// One cached response payload.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime in seconds, counted from `stored_at`
    pub ttl_seconds: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stored at `now_ms`.
    pub fn new(value: Value, now_ms: u64, ttl_seconds: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            ttl_seconds,
        }
    }

    /// Instant (Unix milliseconds) at which the entry stops being served.
    pub fn expires_at(&self) -> u64 {
        self.stored_at
            .saturating_add(self.ttl_seconds.saturating_mul(1000))
    }

    // == Is Expired ==
    /// An entry is expired once `now > stored_at + ttl`.
    ///
    /// At exactly `stored_at + ttl` the entry is still fresh.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at()
    }

    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at().saturating_sub(now_ms)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_fresh_within_ttl() {
        let entry = CacheEntry::new(json!({"tokens": []}), 10_000, 60);

        assert!(!entry.is_expired(10_000));
        assert!(!entry.is_expired(69_999));
        assert_eq!(entry.ttl_remaining_ms(40_000), 30_000);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(json!(1), 0, 60);

        // Still served at the exact boundary, gone one millisecond later
        assert!(!entry.is_expired(60_000));
        assert!(entry.is_expired(60_001));
        assert_eq!(entry.ttl_remaining_ms(60_001), 0);
    }

    #[test]
    fn test_zero_ttl_expires_immediately_after_write() {
        let entry = CacheEntry::new(json!(null), 5, 0);
        assert!(!entry.is_expired(5));
        assert!(entry.is_expired(6));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new(json!(null), u64::MAX - 10, u64::MAX);
        assert_eq!(entry.expires_at(), u64::MAX);
        assert!(!entry.is_expired(u64::MAX));
    }
}
