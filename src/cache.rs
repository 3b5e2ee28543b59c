//! Bounded, time-expiring in-memory cache

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Shared cache whose entries expire `ttl` after insertion
///
/// Expired entries are dropped when read. Inserting into a full cache first evicts
/// everything expired, then the oldest entry if there is still no room.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Stores `value`, returning false when the cache is unusable after a panic
    pub fn insert(&self, key: K, value: V) -> bool {
        self.insert_at(key, value, Instant::now())
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        {
            let entries = self.entries.read().ok()?;
            let entry = entries.get(key)?;
            if !self.is_expired(entry, now) {
                return Some(entry.value.clone());
            }
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.get(key).is_some_and(|e| self.is_expired(e, now)) {
                entries.remove(key);
            }
        }
        None
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    fn insert_at(&self, key: K, value: V, now: Instant) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            warn!("Cache lock poisoned, dropping insert");
            return false;
        };

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, e| !self.is_expired(e, now));

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        true
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_basic_operations() {
        let cache: TtlCache<String, i64> = TtlCache::new(4, TTL);
        assert!(cache.is_empty());

        cache.insert("free".to_string(), 5);
        assert_eq!(cache.get(&"free".to_string()), Some(5));
        assert_eq!(cache.get(&"pro".to_string()), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_poisoned_cache_drops_inserts() {
        let cache: TtlCache<&str, i64> = TtlCache::new(4, TTL);
        assert!(cache.insert("free", 5));

        let shared = cache.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(!cache.insert("pro", 100));
        assert_eq!(cache.get(&"pro"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache: TtlCache<&str, i64> = TtlCache::new(4, TTL);
        let start = Instant::now();
        cache.insert_at("free", 5, start);

        assert_eq!(cache.get_at(&"free", start + Duration::from_secs(59)), Some(5));
        assert_eq!(cache.get_at(&"free", start + TTL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_full_cache_evicts_expired_before_oldest() {
        let cache: TtlCache<&str, i64> = TtlCache::new(2, TTL);
        let start = Instant::now();
        cache.insert_at("a", 1, start);
        cache.insert_at("b", 2, start + Duration::from_secs(30));

        // "a" has expired by now, so it goes and "b" survives
        cache.insert_at("c", 3, start + Duration::from_secs(61));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&"b", start + Duration::from_secs(62)), Some(2));
        assert_eq!(cache.get_at(&"a", start + Duration::from_secs(62)), None);
    }

    #[test]
    fn test_full_cache_evicts_oldest() {
        let cache: TtlCache<&str, i64> = TtlCache::new(2, TTL);
        let start = Instant::now();
        cache.insert_at("a", 1, start);
        cache.insert_at("b", 2, start + Duration::from_secs(1));
        cache.insert_at("c", 3, start + Duration::from_secs(2));

        let now = start + Duration::from_secs(3);
        assert_eq!(cache.get_at(&"a", now), None);
        assert_eq!(cache.get_at(&"b", now), Some(2));
        assert_eq!(cache.get_at(&"c", now), Some(3));
    }

    #[test]
    fn test_overwrite_at_capacity_keeps_others() {
        let cache: TtlCache<&str, i64> = TtlCache::new(2, TTL);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn test_shared_between_threads() {
        let cache: TtlCache<String, i64> = TtlCache::new(8, TTL);
        let clone = cache.clone();

        std::thread::spawn(move || clone.insert("team".to_string(), -1))
            .join()
            .unwrap();

        assert_eq!(cache.get(&"team".to_string()), Some(-1));
    }
}
