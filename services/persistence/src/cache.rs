//! Dedup cache contract and in-memory adapter
//!
//! Plain last-write-wins key/value store. No TTL, no compare-and-swap;
//! callers serialize per key themselves.

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[async_trait]
pub trait DedupCache: Send + Sync {
    /// Last committed canonical value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Unconditionally replace the value for `key`. Never expires.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local cache backed by a concurrent map.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
    gets: AtomicU64,
    sets: AtomicU64,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value without counting it as a cache access.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> u64 {
        self.sets.load(Ordering::SeqCst)
    }

    /// Make subsequent `get` calls fail until reset.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set` calls fail until reset.
    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DedupCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Cache("injected get failure".into()));
        }
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(StoreError::Cache("injected set failure".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set("k", "1.23").await.unwrap();
        cache.set("k", "4.56").await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("4.56"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_count(), 2);
        assert_eq!(cache.set_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let cache = MemoryCache::new();
        cache.fail_sets(true);
        assert!(matches!(cache.set("k", "1").await, Err(StoreError::Cache(_))));
        assert!(cache.is_empty());

        cache.fail_sets(false);
        cache.fail_gets(true);
        cache.set("k", "1").await.unwrap();
        assert!(cache.get("k").await.is_err());
        assert_eq!(cache.peek("k").as_deref(), Some("1"));
    }
}
