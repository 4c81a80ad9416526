//! Shared Cache Module
//!
//! Thread-safe cache handle: the [`CacheStore`] engine and the sweep
//! scheduler state behind a single mutex, plus the lifecycle of the
//! background sweep task.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::{spawn_sweep_task, Sweepable};

// == Shared State ==
/// Everything guarded by the cache mutex.
#[derive(Debug)]
struct Shared<K, V> {
    /// The eviction/expiry engine
    store: CacheStore<K, V>,
    /// Running sweep task, if armed
    sweeper: Option<JoinHandle<()>>,
    /// Set by dispose; the sweep is never re-armed afterwards
    disposed: bool,
    /// Number of periodic sweeps that have run
    sweeps: u64,
    /// Bumped on every cancel; a sweep task only runs for its own generation
    generation: u64,
}

impl<K, V> Shared<K, V> {
    fn cancel_sweeper(&mut self) {
        // A task already waiting on the lock sees the new generation and stops
        self.generation += 1;
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
            debug!("Cache sweep task cancelled");
        }
    }
}

impl<K, V> Sweepable for Shared<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    fn run_sweep(&mut self, generation: u64) -> Option<(usize, usize)> {
        if generation != self.generation {
            return None;
        }
        self.sweeps += 1;
        let outcome = self.store.sweep(tokio::time::Instant::now());
        Some((outcome.expired, outcome.evicted))
    }
}

// == Cache ==
/// Thread-safe cache with TTL expiry and LRU eviction.
///
/// Every operation takes the same lock as the background sweep, so a sweep
/// never interleaves with a foreground call.
///
/// The periodic sweep runs on the ambient tokio runtime. When none is
/// available the cache still honours TTL through lazy checks and
/// [`Cache::cleanup`]; arming is retried on later inserts.
///
/// ```
/// use lru_ttl_cache::Cache;
///
/// let cache = Cache::persistent(Some(2)).unwrap();
/// cache.insert("key1", "v1");
/// cache.insert("key2", "v2");
/// cache.insert("key3", "v3");
///
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get("key1"), None);
/// assert_eq!(cache.get("key3"), Some("v3"));
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    shared: Arc<Mutex<Shared<K, V>>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Creates a cache from an explicit configuration.
    ///
    /// Fails with `InvalidConfiguration` if the configuration is unusable.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let cache = Self {
            shared: Arc::new(Mutex::new(Shared {
                store: CacheStore::new(&config),
                sweeper: None,
                disposed: false,
                sweeps: 0,
                generation: 0,
            })),
        };

        {
            let mut shared = cache.lock();
            cache.ensure_sweeper(&mut shared);
        }

        Ok(cache)
    }

    /// Entries never expire; optionally bounded by `max_entries`.
    pub fn persistent(max_entries: Option<usize>) -> Result<Self> {
        Self::new(CacheConfig::persistent(max_entries))
    }

    /// Every entry expires `expiry_duration` after its last insert.
    pub fn with_expiry(expiry_duration: Duration) -> Result<Self> {
        Self::new(CacheConfig::with_expiry(expiry_duration))
    }

    /// Bounded capacity and uniform TTL combined.
    pub fn with_capacity_and_expiry(max_entries: usize, expiry_duration: Duration) -> Result<Self> {
        Self::new(CacheConfig::with_capacity_and_expiry(
            max_entries,
            expiry_duration,
        ))
    }

    /// Defaults tuned for large working sets.
    pub fn large_dataset() -> Result<Self> {
        Self::new(CacheConfig::large_dataset())
    }

    fn lock(&self) -> MutexGuard<'_, Shared<K, V>> {
        // Critical sections never leave the store half-updated
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arms the sweep task if the configuration calls for one.
    fn ensure_sweeper(&self, shared: &mut Shared<K, V>) {
        if shared.disposed || shared.sweeper.is_some() || !shared.store.needs_sweep() {
            return;
        }

        match Handle::try_current() {
            Ok(_) => {
                let interval = shared.store.cleanup_interval();
                shared.sweeper = Some(spawn_sweep_task(
                    Arc::downgrade(&self.shared),
                    interval,
                    shared.generation,
                ));
            }
            Err(_) => {
                debug!("No tokio runtime available, periodic sweep not armed");
            }
        }
    }

    // == Insert ==
    /// Stores a key-value pair, replacing any existing entry.
    pub fn insert(&self, key: K, value: V) {
        let mut shared = self.lock();
        shared.store.insert(key, value);
        self.ensure_sweeper(&mut shared);
    }

    /// Stores every pair, enforcing the capacity bound once at the end.
    pub fn insert_all<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut shared = self.lock();
        let before = shared.store.access_counter();
        shared.store.insert_all(pairs);
        if shared.store.access_counter() != before {
            self.ensure_sweeper(&mut shared);
        }
    }

    // == Lookups ==
    /// Returns a copy of the live value for `key`, refreshing its recency.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().store.get(key).cloned()
    }

    /// Returns true if a live entry exists for `key`. Recency is untouched.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().store.contains_key(key)
    }

    // == Removal ==
    /// Removes `key` if present.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().store.remove(key);
    }

    /// Removes every listed key that is present.
    pub fn remove_all<'a, Q, I>(&self, keys: I)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        self.lock().store.remove_all(keys);
    }

    // == Lifecycle ==
    /// Empties the cache and stops the background sweep.
    ///
    /// The sweep is re-armed by the next insert, since the configuration
    /// is kept.
    pub fn clear(&self) {
        let mut shared = self.lock();
        shared.cancel_sweeper();
        shared.store.clear();
        info!("Cache cleared");
    }

    /// Empties the cache and stops the background sweep for good.
    ///
    /// The cache stays usable afterwards, relying on lazy expiry checks and
    /// explicit [`Cache::cleanup`] calls.
    pub fn dispose(&self) {
        let mut shared = self.lock();
        shared.disposed = true;
        shared.cancel_sweeper();
        shared.store.clear();
        info!("Cache disposed");
    }

    /// Runs one expiry sweep and one eviction pass right now.
    ///
    /// Returns the number of expired entries removed by this call.
    pub fn cleanup(&self) -> usize {
        let mut shared = self.lock();
        let outcome = shared.store.sweep(tokio::time::Instant::now());
        if outcome.evicted > 0 {
            debug!("Cleanup evicted {} entries", outcome.evicted);
        }
        outcome.expired
    }

    // == Introspection ==
    /// Snapshot of the current keys, expired-but-unswept ones included.
    pub fn keys(&self) -> impl Iterator<Item = K> {
        let snapshot: Vec<K> = self.lock().store.keys().cloned().collect();
        snapshot.into_iter()
    }

    /// Snapshot of the current values, expired-but-unswept ones included.
    pub fn values(&self) -> impl Iterator<Item = V> {
        let snapshot: Vec<V> = self.lock().store.values().cloned().collect();
        snapshot.into_iter()
    }

    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    /// Returns true if the cache holds at least one entry.
    pub fn is_not_empty(&self) -> bool {
        self.lock().store.is_not_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }

    /// Returns true while a background sweep task is armed.
    pub fn is_sweep_scheduled(&self) -> bool {
        self.lock().sweeper.is_some()
    }

    /// Returns how many periodic sweeps have run so far.
    pub fn sweep_count(&self) -> u64 {
        self.lock().sweeps
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.cancel_sweeper();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use tokio::time::sleep;

    #[test]
    fn test_cache_rejects_invalid_configuration() {
        let result: Result<Cache<String, String>> =
            Cache::new(CacheConfig::default().cleanup_interval(Duration::ZERO));
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));

        let result: Result<Cache<String, String>> = Cache::persistent(Some(0));
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_cache_without_runtime_skips_sweeper() {
        let cache = Cache::with_expiry(Duration::from_millis(50)).unwrap();
        cache.insert("a", 1);

        assert!(!cache.is_sweep_scheduled());

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cleanup(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_persistent_cache_has_no_sweeper() {
        let cache: Cache<&str, u32> = Cache::persistent(None).unwrap();
        cache.insert("a", 1);

        assert!(!cache.is_sweep_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reaps_expired_entries() {
        let config = CacheConfig::with_expiry(Duration::from_secs(1))
            .cleanup_interval(Duration::from_secs(2));
        let cache = Cache::new(config).unwrap();
        cache.insert("a", 1);

        assert!(cache.is_sweep_scheduled());

        sleep(Duration::from_millis(2_100)).await;

        assert_eq!(cache.sweep_count(), 1);
        assert!(cache.is_empty(), "Sweep should have removed the entry");
        assert_eq!(cache.stats().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_stops_sweeper_and_insert_rearms() {
        let config = CacheConfig::with_expiry(Duration::from_secs(1))
            .cleanup_interval(Duration::from_secs(2));
        let cache = Cache::new(config).unwrap();
        cache.insert("a", 1);

        cache.clear();
        assert!(!cache.is_sweep_scheduled());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().access_counter, 0);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(cache.sweep_count(), 0, "No sweep may fire after clear");

        cache.insert("b", 2);
        assert!(cache.is_sweep_scheduled());

        // The new task waits a full interval from the re-arm
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(cache.sweep_count(), 0);
        assert_eq!(cache.len(), 1);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(cache.sweep_count(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_is_terminal_for_sweeper() {
        let config = CacheConfig::with_expiry(Duration::from_secs(1))
            .cleanup_interval(Duration::from_secs(2));
        let cache = Cache::new(config).unwrap();
        cache.insert("a", 1);

        cache.dispose();
        cache.insert("b", 2);

        assert!(!cache.is_sweep_scheduled());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(cache.sweep_count(), 0);

        // Still correct through lazy expiry and manual cleanup
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains_key("b"));
        assert_eq!(cache.cleanup(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_all_empty_does_not_rearm() {
        let cache: Cache<&str, u32> = Cache::persistent(Some(4)).unwrap();
        cache.clear();

        cache.insert_all(Vec::new());
        assert!(!cache.is_sweep_scheduled());

        cache.insert_all(vec![("a", 1)]);
        assert!(cache.is_sweep_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_and_values_are_snapshots() {
        let cache = Cache::persistent(None).unwrap();
        cache.insert_all(vec![("a", 1), ("b", 2)]);

        let keys = cache.keys();
        cache.insert("c", 3);

        let mut keys: Vec<&str> = keys.collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);

        let mut values: Vec<u32> = cache.values().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_clear_cancels_sweep_waiting_on_lock() {
        let config = CacheConfig::with_expiry(Duration::from_secs(60))
            .cleanup_interval(Duration::from_millis(20));
        let cache = Cache::new(config).unwrap();
        cache.insert("a", 1);

        // Hold the lock across a tick so the sweep task blocks on it
        let holder = {
            let shared = Arc::clone(&cache.shared);
            std::thread::spawn(move || {
                let _guard = shared.lock().unwrap();
                std::thread::sleep(Duration::from_millis(60));
            })
        };
        std::thread::sleep(Duration::from_millis(10));

        cache.clear();
        let after_clear = cache.sweep_count();
        holder.join().unwrap();

        sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.sweep_count(), after_clear, "Sweep fired after clear");
        assert!(!cache.is_sweep_scheduled());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_clear_then_insert_runs_only_the_new_sweeper() {
        let config = CacheConfig::with_expiry(Duration::from_secs(60))
            .cleanup_interval(Duration::from_millis(200));
        let cache = Cache::new(config).unwrap();

        let holder = {
            let shared = Arc::clone(&cache.shared);
            std::thread::spawn(move || {
                let _guard = shared.lock().unwrap();
                std::thread::sleep(Duration::from_millis(250));
            })
        };
        std::thread::sleep(Duration::from_millis(10));

        // Re-arm right after clear while the old task still waits on the lock
        cache.clear();
        cache.insert("b", 2);
        let before = cache.sweep_count();
        holder.join().unwrap();

        // Old tick is dropped; the new task first fires 200ms after the insert
        sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.sweep_count(), before);
        assert!(cache.is_sweep_scheduled());
    }
}
