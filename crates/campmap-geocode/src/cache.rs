//! In-memory cache of successful searches, keyed by normalized query.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::result::LocationResult;

const DEFAULT_MAX_ENTRIES: usize = 256;

/// Size bound and lifetime for cached searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` keeps every entry. When full, the oldest insert is evicted.
    pub max_entries: Option<usize>,
    /// `None` keeps entries until [`SearchCache::clear`].
    pub ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: Some(DEFAULT_MAX_ENTRIES),
            ttl: None,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    results: Vec<LocationResult>,
    inserted_at: Instant,
}

#[derive(Debug)]
pub(crate) struct SearchCache {
    policy: CachePolicy,
    entries: HashMap<String, CacheEntry>,
}

/// Lower-cases and trims a query for use as a cache key.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

impl SearchCache {
    pub(crate) fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
        }
    }

    /// Returns a copy of the cached list, dropping it first if it has expired.
    pub(crate) fn get(&mut self, key: &str) -> Option<Vec<LocationResult>> {
        let expired = match (self.entries.get(key), self.policy.ttl) {
            (None, _) => return None,
            (Some(entry), Some(ttl)) => entry.inserted_at.elapsed() >= ttl,
            (Some(_), None) => false,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.results.clone())
    }

    pub(crate) fn insert(&mut self, key: String, results: Vec<LocationResult>) {
        if self.policy.max_entries == Some(0) {
            return;
        }
        self.purge_expired();
        if let Some(max) = self.policy.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&mut self) {
        let Some(ttl) = self.policy.ttl else {
            return;
        };
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        let purged = before - self.entries.len();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired cached searches");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            tracing::debug!(query = %key, "evicting oldest cached search");
            self.entries.remove(&key);
        }
    }
}
