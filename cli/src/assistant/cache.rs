//! # Response Cache
//!
//! File: cli/src/assistant/cache.rs
//! Author: Christi Mahu
//!
//! Per-session memo of finished replies, keyed by the normalized question
//! (trimmed, lowercased). A hit returns the stored reply byte for byte,
//! follow-up line included, and skips the model call entirely.
//!
//! Entries never expire on their own. The cache is bounded: once `capacity`
//! entries exist, inserting a new key evicts the least recently used one. A
//! capacity of zero disables caching.
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

/// Normalizes a question into its cache key.
pub fn normalize_input(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Bounded reply cache owned by one session.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Option<LruCache<String, String>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    /// Looks up the reply for `input`, marking it as recently used.
    pub fn get(&mut self, input: &str) -> Option<String> {
        let key = normalize_input(input);
        let hit = self.entries.as_mut()?.get(&key).cloned();
        if hit.is_some() {
            debug!("Response cache hit for '{}'", key);
        }
        hit
    }

    /// Stores `reply` for `input`, evicting the oldest entry when full.
    pub fn insert(&mut self, input: &str, reply: String) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let key = normalize_input(input);
        if let Some((evicted, _)) = entries.push(key.clone(), reply) {
            if evicted != key {
                debug!("Response cache full, evicted '{}'", evicted);
            }
        }
    }

    #[cfg(test)]
    pub fn contains(&self, input: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains(&normalize_input(input)))
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
