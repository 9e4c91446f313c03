// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process TTL cache.
//!
//! A thin time-to-live decorator over an LRU map, used for hot
//! greeting-by-id and user-by-username lookups. Entries expire lazily:
//! an expired entry is dropped on the next read.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed cache with per-entry expiry.
pub struct CacheManager<V> {
    cache: Mutex<LruCache<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> CacheManager<V> {
    /// Create a new cache.
    ///
    /// - `capacity`: max number of entries before LRU eviction.
    /// - `default_ttl`: time-to-live used by [`CacheManager::put`].
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            default_ttl,
        }
    }

    /// Look up a value, dropping it if its TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(key) {
            if Instant::now() < entry.expires_at {
                return Some(entry.value.clone());
            }
            cache.pop(key);
        }
        None
    }

    /// Store a value with the default TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Store a value with an explicit TTL.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key.into(),
                CacheEntry {
                    value,
                    expires_at: Instant::now() + ttl,
                },
            );
        }
    }

    /// Remove a single entry.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(key);
        }
    }

    /// Remove all entries.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}
