//! In-process [`SharedStore`] backend.
//!
//! Used for tests and single-instance deployments where no external shared
//! cache service is available. TTL expiry is driven by an injected
//! [`Clock`](finsight_core::Clock), so tests can assert expiry behavior with
//! a [`ManualClock`](finsight_core::ManualClock) instead of sleeping.

use async_trait::async_trait;
use dashmap::DashMap;
use finsight_core::{DynClock, SystemClock, glob_to_regex};
use finsight_store::{SharedStore, StoreError, StoreResult, StoreWrite};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Debug, Clone)]
struct StoredValue {
    bytes: Vec<u8>,
    expires_at: OffsetDateTime,
}

/// Shared-store backend over a concurrent in-process map.
#[derive(Debug)]
pub struct MemorySharedStore {
    entries: DashMap<String, StoredValue>,
    clock: DynClock,
}

impl MemorySharedStore {
    /// Create a store running on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store with an injected clock.
    pub fn with_clock(clock: DynClock) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of entries currently held, expired ones included until they are
    /// lazily dropped or deleted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Test helper.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn is_live(&self, value: &StoredValue) -> bool {
        value.expires_at > self.clock.now()
    }
}

impl Default for MemorySharedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SharedStore for MemorySharedStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(entry) = self.entries.get(key) {
            if self.is_live(&entry) {
                return Ok(Some(entry.bytes.clone()));
            }
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(
            key.to_string(),
            StoredValue {
                bytes: value,
                expires_at,
            },
        );
        Ok(())
    }

    async fn set_many(&self, writes: &[StoreWrite]) -> StoreResult<()> {
        // Applied in order; later writes win on duplicate keys.
        for write in writes {
            self.set_with_ttl(&write.key, write.value.clone(), write.ttl)
                .await?;
        }
        Ok(())
    }

    async fn delete_keys(&self, keys: &[String]) -> StoreResult<u64> {
        let mut removed = 0u64;
        for key in keys {
            if let Some((_, value)) = self.entries.remove(key) {
                if self.is_live(&value) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let regex = glob_to_regex(pattern)
            .map_err(|e| StoreError::command(format!("invalid pattern '{pattern}': {e}")))?;

        let keys = self
            .entries
            .iter()
            .filter(|entry| self.is_live(entry.value()) && regex.is_match(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_core::ManualClock;
    use time::macros::datetime;

    fn store_with_manual_clock() -> (MemorySharedStore, ManualClock) {
        let clock = ManualClock::new(datetime!(2024-03-01 12:00:00 UTC));
        let store = MemorySharedStore::with_clock(Arc::new(clock.clone()));
        (store, clock)
    }

    #[tokio::test]
    async fn test_get_returns_what_was_set() {
        let (store, _clock) = store_with_manual_clock();
        store
            .set_with_ttl("insights:a", b"payload".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("insights:a").await.unwrap(),
            Some(b"payload".to_vec())
        );
        assert_eq!(store.get("insights:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_monotonicity() {
        let (store, clock) = store_with_manual_clock();
        store
            .set_with_ttl("insights:a", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        // Retrievable just before expiry, absent just after.
        clock.advance(Duration::from_secs(59));
        assert!(store.get("insights:a").await.unwrap().is_some());

        clock.advance(Duration::from_secs(2));
        assert!(store.get("insights:a").await.unwrap().is_none());
        // Expired entry was lazily dropped on read.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_resets_expiry() {
        let (store, clock) = store_with_manual_clock();
        store
            .set_with_ttl("insights:a", b"v1".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(8));
        store
            .set_with_ttl("insights:a", b"v2".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(8));
        assert_eq!(store.get("insights:a").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_set_many_applies_in_order() {
        let (store, _clock) = store_with_manual_clock();
        let writes = vec![
            StoreWrite::new("insights:a", b"first".to_vec(), Duration::from_secs(60)),
            StoreWrite::new("insights:b", b"other".to_vec(), Duration::from_secs(60)),
            StoreWrite::new("insights:a", b"second".to_vec(), Duration::from_secs(60)),
        ];

        store.set_many(&writes).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get("insights:a").await.unwrap(),
            Some(b"second".to_vec())
        );
    }

    #[tokio::test]
    async fn test_keys_matching_filters_expired() {
        let (store, clock) = store_with_manual_clock();
        store
            .set_with_ttl("insights:a", b"v".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();
        store
            .set_with_ttl("insights:b", b"v".to_vec(), Duration::from_secs(100))
            .await
            .unwrap();
        store
            .set_with_ttl("patterns:c", b"v".to_vec(), Duration::from_secs(100))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(11));
        let keys = store.keys_matching("insights:*").await.unwrap();
        assert_eq!(keys, vec!["insights:b".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_counts_only_live_entries() {
        let (store, clock) = store_with_manual_clock();
        store
            .set_with_ttl("insights:a", b"v".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();
        store
            .set_with_ttl("insights:b", b"v".to_vec(), Duration::from_secs(100))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(11));
        let removed = store
            .delete_keys(&[
                "insights:a".to_string(),
                "insights:b".to_string(),
                "insights:missing".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_ping_always_succeeds() {
        let (store, _clock) = store_with_manual_clock();
        assert!(store.ping().await.is_ok());
        assert_eq!(store.backend_name(), "memory");
    }
}
