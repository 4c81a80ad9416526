//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are indexed by their access stamp. Stamps come from a strictly
/// increasing counter, so each stamp maps to exactly one key and the
/// smallest stamp is always the least recently used key.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Keys ordered by access stamp (first = least recently used)
    order: BTreeMap<u64, K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Insert ==
    /// Starts tracking a key under a fresh stamp.
    pub fn insert(&mut self, stamp: u64, key: K) {
        self.order.insert(stamp, key);
    }

    // == Touch ==
    /// Moves the key tracked under `previous` to the fresh stamp `current`.
    ///
    /// Returns false if nothing was tracked under `previous`.
    pub fn touch(&mut self, previous: u64, current: u64) -> bool {
        match self.order.remove(&previous) {
            Some(key) => {
                self.order.insert(current, key);
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Stops tracking the key stored under `stamp`.
    pub fn remove(&mut self, stamp: u64) -> Option<K> {
        self.order.remove(&stamp)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru: LruTracker<&str> = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
    }

    #[test]
    fn test_lru_insert_orders_by_stamp() {
        let mut lru = LruTracker::new();

        lru.insert(1, "key1");
        lru.insert(2, "key2");
        lru.insert(3, "key3");

        assert_eq!(lru.len(), 3);
        // key1 is oldest (lowest stamp)
        assert_eq!(lru.peek_oldest(), Some(&"key1"));
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        lru.insert(1, "key1");
        lru.insert(2, "key2");
        lru.insert(3, "key3");

        // Touch key1 again - moves to most recent
        assert!(lru.touch(1, 4));

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&"key2"));
    }

    #[test]
    fn test_lru_touch_unknown_stamp() {
        let mut lru = LruTracker::new();
        lru.insert(1, "key1");

        assert!(!lru.touch(7, 8));
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.peek_oldest(), Some(&"key1"));
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.insert(1, "key1");
        lru.insert(2, "key2");
        lru.insert(3, "key3");

        assert_eq!(lru.evict_oldest(), Some("key1"));
        assert_eq!(lru.len(), 2);

        assert_eq!(lru.evict_oldest(), Some("key2"));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_evict_empty() {
        let mut lru: LruTracker<String> = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.insert(1, "key1");
        lru.insert(2, "key2");
        lru.insert(3, "key3");

        assert_eq!(lru.remove(2), Some("key2"));
        assert_eq!(lru.remove(2), None);

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.evict_oldest(), Some("key1"));
        assert_eq!(lru.evict_oldest(), Some("key3"));
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruTracker::new();

        lru.insert(1, "a");
        lru.insert(2, "b");
        lru.insert(3, "c");

        // a -> 4, c -> 5, b -> 6
        lru.touch(1, 4);
        lru.touch(3, 5);
        lru.touch(2, 6);

        assert_eq!(lru.evict_oldest(), Some("a"));
        assert_eq!(lru.evict_oldest(), Some("c"));
        assert_eq!(lru.evict_oldest(), Some("b"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();
        lru.insert(1, "a");
        lru.insert(2, "b");

        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }
}
