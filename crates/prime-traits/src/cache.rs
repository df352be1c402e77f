//! Key-value cache capability.
//!
//! The pipeline never touches a cache directly. Providers receive one by
//! injection, which keeps memoization out of the alignment and ranking code
//! and lets tests run against plain in-memory fixtures.

use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};
use tracing::warn;

/// A string-keyed store of serialized values.
///
/// Implementations must treat failures as misses: a cache can make the
/// pipeline faster but never make it fail.
pub trait Cache: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String);
}

impl<C: Cache + ?Sized> Cache for &C {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) {
        (**self).put(key, value);
    }
}

/// Reads and deserializes a JSON value from `cache`.
///
/// Entries that no longer deserialize are reported and treated as misses.
pub fn get_json<T: DeserializeOwned, C: Cache + ?Sized>(cache: &C, key: &str) -> Option<T> {
    let raw = cache.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable cache entry");
            None
        }
    }
}

/// Serializes `value` as JSON and stores it in `cache`.
pub fn put_json<T: Serialize + ?Sized, C: Cache + ?Sized>(cache: &C, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.put(key, raw),
        Err(e) => warn!(key, error = %e, "failed to serialize cache entry"),
    }
}

/// Process-lifetime cache backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_get_put() {
        let cache = MemoryCache::new();
        assert!(cache.get("a").is_none());
        cache.put("a", "1".to_string());
        cache.put("a", "2".to_string());
        assert_eq!(cache.get("a").as_deref(), Some("2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_json_helpers() {
        let cache = MemoryCache::new();
        put_json(&cache, "k", &vec![1.5, 2.5]);
        let back: Option<Vec<f64>> = get_json(&cache, "k");
        assert_eq!(back, Some(vec![1.5, 2.5]));
    }

    #[test]
    fn test_unreadable_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.put("k", "not json".to_string());
        let back: Option<Vec<f64>> = get_json(&cache, "k");
        assert!(back.is_none());
    }

    #[test]
    fn test_cache_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Cache>>();
    }
}
