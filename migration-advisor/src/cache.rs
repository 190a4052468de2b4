//! Short-lived cache of fetched chain health records.
//!
//! Entries expire after a fixed TTL. When full, the oldest entry is evicted
//! before a new one is admitted. A capacity of 0 disables caching.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use migration_core::{normalize_chain, ChainHealthRecord};

use crate::config::CacheConfig;

#[derive(Debug, Clone)]
struct CachedRecord {
    record: ChainHealthRecord,
    fetched_at: DateTime<Utc>,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Concurrent TTL cache keyed by case-folded chain name.
pub struct InputCache {
    entries: DashMap<String, CachedRecord>,
    ttl: Duration,
    max_entries: usize,

    // Statistics
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl InputCache {
    /// Create a cache with a TTL in seconds and a capacity.
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl_secs, config.max_entries)
    }

    /// Look up a chain record as of now.
    pub fn get(&self, chain: &str) -> Option<ChainHealthRecord> {
        self.get_at(chain, Utc::now())
    }

    /// Look up a chain record as of `now`. Expired entries are removed.
    pub fn get_at(&self, chain: &str, now: DateTime<Utc>) -> Option<ChainHealthRecord> {
        let key = normalize_chain(chain);
        let cached = self.entries.get(&key).map(|entry| entry.clone());

        match cached {
            Some(cached) if now - cached.fetched_at <= self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(cached.record)
            }
            Some(_) => {
                self.remove_counted(&key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a record fetched now.
    pub fn insert(&self, record: ChainHealthRecord) {
        self.insert_at(record, Utc::now());
    }

    /// Store a record fetched at `now`.
    pub fn insert_at(&self, record: ChainHealthRecord, now: DateTime<Utc>) {
        if self.max_entries == 0 {
            return;
        }
        let key = normalize_chain(&record.name);

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        self.entries.insert(
            key,
            CachedRecord {
                record,
                fetched_at: now,
            },
        );
    }

    /// Remove every entry older than the TTL as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| now - entry.fetched_at > self.ttl)
            .map(|entry| entry.key().clone())
            .collect();

        let cleaned = expired.iter().filter(|key| self.remove_counted(key)).count();
        if cleaned > 0 {
            debug!(cleaned, "Expired cache entries removed");
        }
        cleaned
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Number of cached entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries. Statistics are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn remove_counted(&self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by(|a, b| {
                a.fetched_at
                    .cmp(&b.fetched_at)
                    .then_with(|| a.key().cmp(b.key()))
            })
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => {
                debug!(chain = %key, "Evicting oldest cache entry");
                self.remove_counted(&key)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ChainHealthRecord {
        ChainHealthRecord::new(name, 1.0e9, 0.0, 100).unwrap()
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = InputCache::new(300, 10);
        let now = Utc::now();

        assert!(cache.get_at("solana", now).is_none());
        cache.insert_at(record("Solana"), now);
        assert_eq!(cache.get_at(" SOLANA", now).unwrap().name, "Solana");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_entries_expire() {
        let cache = InputCache::new(300, 10);
        let fetched = Utc::now();
        cache.insert_at(record("Solana"), fetched);

        assert!(cache.get_at("solana", fetched + Duration::seconds(300)).is_some());
        assert!(cache.get_at("solana", fetched + Duration::seconds(301)).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let cache = InputCache::new(60, 10);
        let start = Utc::now();
        cache.insert_at(record("Fantom"), start);
        cache.insert_at(record("Solana"), start + Duration::seconds(50));

        assert_eq!(cache.cleanup_expired(start + Duration::seconds(61)), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("solana", start + Duration::seconds(61)).is_some());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = InputCache::new(300, 2);
        let start = Utc::now();
        cache.insert_at(record("Fantom"), start);
        cache.insert_at(record("Solana"), start + Duration::seconds(1));
        cache.insert_at(record("Base"), start + Duration::seconds(2));

        let now = start + Duration::seconds(3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get_at("fantom", now).is_none());
        assert!(cache.get_at("solana", now).is_some());
        assert!(cache.get_at("base", now).is_some());

        // refreshing an existing key does not evict
        cache.insert_at(record("Solana"), now);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = InputCache::new(300, 0);
        cache.insert(record("Solana"));
        assert!(cache.is_empty());
        assert!(cache.get("solana").is_none());
    }
}
