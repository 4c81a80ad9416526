//! Cache Store Module
//!
//! Eviction/expiry engine combining HashMap storage with LRU tracking and
//! TTL expiration. The store is a plain single-owner structure; [`Cache`]
//! adds locking and the background sweep on top of it.
//!
//! [`Cache`]: crate::cache::Cache

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{ActivityCounters, CacheEntry, CacheStats, LruTracker};
use crate::config::CacheConfig;

// == Sweep Outcome ==
/// Entries removed by one full sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Entries removed because their TTL elapsed
    pub expired: usize,
    /// Entries removed to honour the capacity bound
    pub evicted: usize,
}

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Hit/miss/eviction/expiration counters
    counters: ActivityCounters,
    /// Uniform TTL applied on insert
    expiry_duration: Option<Duration>,
    /// Maximum number of entries allowed
    max_entries: Option<usize>,
    /// Period of the background sweep
    cleanup_interval: Duration,
    /// Source of recency stamps, strictly increasing
    access_counter: u64,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore from an already validated configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: ActivityCounters::default(),
            expiry_duration: config.expiry_duration,
            max_entries: config.max_entries,
            cleanup_interval: config.cleanup_interval,
            access_counter: 0,
        }
    }

    // == Insert ==
    /// Stores a key-value pair, then enforces the capacity bound.
    ///
    /// If the key already exists, the value is replaced, its TTL restarts
    /// and it becomes the most recently used entry.
    pub fn insert(&mut self, key: K, value: V) {
        self.put(key, value, Instant::now());
        self.enforce_capacity();
    }

    // == Insert All ==
    /// Stores every pair in iteration order, then enforces the capacity
    /// bound once for the whole batch.
    pub fn insert_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let now = Instant::now();
        let mut inserted = 0usize;
        for (key, value) in pairs {
            self.put(key, value, now);
            inserted += 1;
        }

        if inserted > 0 {
            self.enforce_capacity();
        }
    }

    /// Inserts or replaces without capacity enforcement.
    fn put(&mut self, key: K, value: V, now: Instant) {
        let stamp = self.next_stamp();
        let fresh = CacheEntry::new(value, self.expiry_duration.map(|ttl| now + ttl), stamp);

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(fresh);
                let tracked = self.lru.touch(previous.access_time, stamp);
                debug_assert!(tracked, "recency index out of sync with entries");
            }
            Entry::Vacant(vacant) => {
                self.lru.insert(stamp, vacant.key().clone());
                vacant.insert(fresh);
            }
        }
    }

    fn next_stamp(&mut self) -> u64 {
        self.access_counter += 1;
        self.access_counter
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on the spot and reported as absent.
    /// A live hit becomes the most recently used entry.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.remove_if_expired(key, Instant::now()) {
            self.counters.record_miss();
            return None;
        }

        match self.entries.get_mut(key) {
            Some(entry) => {
                self.access_counter += 1;
                let stamp = self.access_counter;
                let previous = std::mem::replace(&mut entry.access_time, stamp);
                let tracked = self.lru.touch(previous, stamp);
                debug_assert!(tracked, "recency index out of sync with entries");
                self.counters.record_hit();
                Some(&entry.value)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Contains Key ==
    /// Returns true if a live entry exists for `key`.
    ///
    /// Expired entries are removed on the spot. Recency is left untouched.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.remove_if_expired(key, Instant::now()) {
            return false;
        }
        self.entries.contains_key(key)
    }

    fn remove_if_expired<Q>(&mut self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));

        if expired {
            self.discard(key);
            self.counters.record_expirations(1);
        }
        expired
    }

    // == Remove ==
    /// Removes an entry by key. Absent keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.discard(key);
    }

    // == Remove All ==
    /// Removes every listed key. Absent keys are ignored.
    pub fn remove_all<'a, Q, I>(&mut self, keys: I)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        for key in keys {
            self.discard(key);
        }
    }

    fn discard<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.lru.remove(entry.access_time);
        Some(entry)
    }

    // == Clear ==
    /// Drops every entry and resets the recency counter and activity
    /// counters. Configuration is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.counters.reset();
        self.access_counter = 0;
    }

    // == Cleanup ==
    /// Runs one expiry sweep and one eviction pass.
    ///
    /// Returns the number of expired entries removed by this call.
    pub fn cleanup(&mut self) -> usize {
        self.sweep(Instant::now()).expired
    }

    // == Sweep ==
    /// Removes every entry expired as of `now`, then enforces the
    /// capacity bound.
    pub fn sweep(&mut self, now: Instant) -> SweepOutcome {
        let expired = self.remove_expired(now);
        let evicted = self.enforce_capacity();
        SweepOutcome { expired, evicted }
    }

    fn remove_expired(&mut self, now: Instant) -> usize {
        if self.expiry_duration.is_none() {
            return 0;
        }

        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in &expired_keys {
            self.discard(key);
        }

        self.counters.record_expirations(count);
        count
    }

    // == Enforce Capacity ==
    /// Evicts the least recently used entries until the bound holds.
    ///
    /// Returns the number of entries evicted.
    pub fn enforce_capacity(&mut self) -> usize {
        let Some(max_entries) = self.max_entries else {
            return 0;
        };

        let excess = self.entries.len().saturating_sub(max_entries);
        let mut evicted = 0;
        for _ in 0..excess {
            match self.lru.evict_oldest() {
                Some(key) => {
                    self.entries.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }

        self.counters.record_evictions(evicted);
        evicted
    }

    // == Keys / Values ==
    /// Iterates over the current keys, expired-but-unswept ones included.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Iterates over the current values, expired-but-unswept ones included.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|entry| &entry.value)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the cache holds at least one entry.
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            has_expiry: self.expiry_duration.is_some(),
            expiry_duration_ms: self.expiry_duration.map(|ttl| ttl.as_millis() as u64),
            cleanup_interval_ms: self.cleanup_interval.as_millis() as u64,
            access_counter: self.access_counter,
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expirations: self.counters.expirations,
        }
    }

    /// Returns the current value of the recency counter.
    pub fn access_counter(&self) -> u64 {
        self.access_counter
    }

    /// Returns the background sweep period.
    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    /// Returns true if a periodic sweep has any work to do.
    pub fn needs_sweep(&self) -> bool {
        self.expiry_duration.is_some() || self.max_entries.is_some()
    }
}
