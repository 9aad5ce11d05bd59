//! Short-lived result cache keyed by request URL.
//!
//! Entries expire lazily: a read past `expires_at_ms` misses and drops the
//! entry. There is no background sweep and no in-flight de-duplication.

use crate::domain::logging::TimeProvider;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub expires_at_ms: i64,
    pub payload: V,
}

pub struct TtlCache<V> {
    ttl_ms: i64,
    clock: Arc<dyn TimeProvider>,
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl_ms: i64, clock: Arc<dyn TimeProvider>) -> Self {
        Self { ttl_ms, clock, entries: HashMap::new() }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Live entry for `key`; an expired one is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if entry.expires_at_ms > now => Some(entry.payload.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores with the cache's default TTL.
    pub fn insert(&mut self, key: &str, value: V) {
        self.put(key, value, self.ttl_ms);
    }

    /// Stores (or replaces) an entry expiring `ttl_ms` from now.
    pub fn put(&mut self, key: &str, value: V, ttl_ms: i64) {
        let expires_at_ms = self.clock.now_ms().saturating_add(ttl_ms);
        self.entries.insert(key.to_string(), CacheEntry { expires_at_ms, payload: value });
    }

    /// Stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::services::ManualClock;

    fn cache(clock: &Arc<ManualClock>) -> TtlCache<String> {
        TtlCache::new(30_000, clock.clone())
    }

    #[test]
    fn hit_until_expiry() {
        let clock = Arc::new(ManualClock::new(1_000));
        let mut cache = cache(&clock);
        cache.put("k", "v".to_string(), 100);

        clock.advance(99);
        assert_eq!(cache.get("k").as_deref(), Some("v"));
        clock.advance(1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn reput_refreshes_expiry_and_value() {
        let clock = Arc::new(ManualClock::new(0));
        let mut cache = cache(&clock);
        cache.put("k", "old".to_string(), 100);
        clock.advance(80);
        cache.put("k", "new".to_string(), 100);
        clock.advance(80);
        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn default_ttl_and_clear() {
        let clock = Arc::new(ManualClock::new(0));
        let mut cache = cache(&clock);
        cache.insert("a", "1".to_string());
        cache.insert("b", "2".to_string());
        clock.advance(29_999);
        assert_eq!(cache.get("a").as_deref(), Some("1"));
        cache.clear();
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn expired_entries_linger_until_read() {
        let clock = Arc::new(ManualClock::new(0));
        let mut cache = cache(&clock);
        cache.put("a", "1".to_string(), 10);
        clock.advance(50);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
    }
}
