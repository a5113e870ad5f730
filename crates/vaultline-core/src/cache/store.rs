//! In-process cache store

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::time::Instant;

use super::entry::CacheEntry;

/// Map from secret key to encrypted cache entry
///
/// Expiry is lazy: `get` hides expired entries but leaves them in place until
/// the next `put` for the same key overwrites them. There is no background
/// sweep.
///
/// # Thread Safety
///
/// Uses a `parking_lot::RwLock` internally. Each operation takes the lock
/// briefly and never across an `.await`.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the entry for `key` if present and not expired
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .cloned()
    }

    /// Store an entry, overwriting whatever was there (last writer wins)
    pub fn put(&self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.write().insert(key.into(), entry);
    }

    /// Remove one entry, returning whether it existed
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
