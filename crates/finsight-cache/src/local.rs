//! Local (tier-1) store: an in-process map of key to entry with an absolute
//! expiry. Purely synchronous; never shared across processes.

use dashmap::DashMap;
use finsight_core::{CacheEntry, DynClock, Result as CoreResult, glob_to_regex};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Debug, Clone)]
struct LocalEntry {
    entry: CacheEntry,
    expires_at: OffsetDateTime,
}

/// Concurrent in-process cache tier.
///
/// Clones share the underlying map, so the janitor can sweep the same tier
/// the manager serves from.
#[derive(Debug, Clone)]
pub struct LocalStore {
    entries: Arc<DashMap<String, LocalEntry>>,
    clock: DynClock,
}

impl LocalStore {
    pub fn new(clock: DynClock) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Store an entry expiring `ttl` from now, overwriting any existing one.
    pub fn put(&self, key: &str, entry: CacheEntry, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries
            .insert(key.to_string(), LocalEntry { entry, expires_at });
    }

    /// Fetch a live entry. Expired entries are lazily removed on read.
    ///
    /// Local hits do not bump `access_count`; a local entry is already
    /// promoted.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        if let Some(found) = self.entries.get(key) {
            if found.expires_at > self.clock.now() {
                return Some(found.entry.clone());
            }
            drop(found);
            self.entries.remove(key);
        }
        None
    }

    /// Remove every key matching a shared-store-style glob pattern.
    pub fn delete_matching(&self, pattern: &str) -> CoreResult<u64> {
        let regex = glob_to_regex(pattern)?;

        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| regex.is_match(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0u64;
        for key in &matching {
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Drop every expired entry, returning how many were evicted.
    ///
    /// Called by the janitor; everyone else relies on lazy removal in `get`.
    pub fn sweep(&self) -> u64 {
        let now = self.clock.now();
        // Counted inside the closure: concurrent puts make before/after
        // length arithmetic unreliable.
        let mut removed = 0u64;
        self.entries.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
