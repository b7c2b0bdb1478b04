//! Content-addressed LRU+TTL compilation cache (`spec.md` §4.10).
//!
//! Generic over the cached value `V` (the facade's `CompilationOutput`) so
//! this crate never needs to depend on the phases it caches the result of.
//! Following the registry's own choice of a `parking_lot` lock over shared
//! state (`flowc-registry`), all cache state lives behind a single mutex;
//! recency bookkeeping (the `lru` crate's own ordering) and hit/miss/eviction
//! counters are updated together under that one lock, so they never drift
//! apart under contention.

mod key;
mod stats;

pub use key::{hash_bytes, CacheKey};
pub use stats::CacheStats;

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 256, max_age: Duration::from_secs(300) }
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Inner<V> {
    lru: LruCache<CacheKey, Entry<V>>,
    stats: CacheStats,
}

pub struct CompilationCache<V> {
    inner: Mutex<Inner<V>>,
    max_age: Duration,
}

impl<V: Clone> CompilationCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries.max(1)).expect("clamped to at least 1");
        Self { inner: Mutex::new(Inner { lru: LruCache::new(capacity), stats: CacheStats::default() }), max_age: config.max_age }
    }

    /// `Some(value)` on a live hit; `None` on a miss, an expired entry, or
    /// one invalidated by a stale key component. An expired entry is
    /// evicted on lookup rather than left to linger.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut inner = self.inner.lock();
        let live = inner.lru.get(key).map(|entry| entry.inserted_at.elapsed() < self.max_age);

        match live {
            Some(true) => {
                let value = inner.lru.get(key).expect("just confirmed present").value.clone();
                inner.stats.hits += 1;
                Some(value)
            }
            Some(false) => {
                inner.lru.pop(key);
                inner.stats.misses += 1;
                inner.stats.entries = inner.lru.len();
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Stores `value`, possibly evicting the least-recently-used entry.
    /// Compilation errors are never passed here (`spec.md` §4.10) — only
    /// successful outputs are cached.
    pub fn put(&self, key: CacheKey, value: V) {
        let mut inner = self.inner.lock();
        let evicted = inner.lru.put(key, Entry { value, inserted_at: Instant::now() });
        if evicted.is_some() {
            inner.stats.evictions += 1;
        }
        inner.stats.entries = inner.lru.len();
    }

    /// Removes every entry for `dag_name`.
    pub fn invalidate(&self, dag_name: &str) {
        let mut inner = self.inner.lock();
        let stale: Vec<CacheKey> = inner.lru.iter().filter(|(k, _)| k.dag_name == dag_name).map(|(k, _)| k.clone()).collect();
        for key in stale {
            inner.lru.pop(&key);
        }
        inner.stats.entries = inner.lru.len();
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        inner.lru.clear();
        inner.stats.entries = 0;
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(dag: &str, n: u32) -> CacheKey {
        CacheKey::new(dag, format!("src{}", n), "reg")
    }

    #[test]
    fn miss_then_hit_updates_stats() {
        let cache: CompilationCache<u32> = CompilationCache::new(CacheConfig::default());
        assert_eq!(cache.get(&key("p", 1)), None);
        cache.put(key("p", 1), 42);
        assert_eq!(cache.get(&key("p", 1)), Some(42));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache: CompilationCache<u32> = CompilationCache::new(CacheConfig { max_entries: 8, max_age: Duration::from_millis(1) });
        cache.put(key("p", 1), 7);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&key("p", 1)), None);
    }

    #[test]
    fn evicts_least_recently_used_entry_over_capacity() {
        let cache: CompilationCache<u32> = CompilationCache::new(CacheConfig { max_entries: 2, max_age: Duration::from_secs(60) });
        cache.put(key("p", 1), 1);
        cache.put(key("p", 2), 2);
        cache.get(&key("p", 1));
        cache.put(key("p", 3), 3);
        assert_eq!(cache.get(&key("p", 2)), None, "least-recently-used entry should have been evicted");
        assert_eq!(cache.get(&key("p", 1)), Some(1));
        assert!(cache.stats().evictions >= 1);
    }

    #[test]
    fn invalidate_removes_only_the_named_dag() {
        let cache: CompilationCache<u32> = CompilationCache::new(CacheConfig::default());
        cache.put(key("a", 1), 1);
        cache.put(key("b", 1), 2);
        cache.invalidate("a");
        assert_eq!(cache.get(&key("a", 1)), None);
        assert_eq!(cache.get(&key("b", 1)), Some(2));
    }
}
