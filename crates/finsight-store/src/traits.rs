//! Store traits for the shared cache abstraction layer.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreResult;
use crate::types::StoreWrite;

/// The shared (tier-2) cache store contract.
///
/// Implementations must be thread-safe (`Send + Sync`) and own their request
/// timeout discipline; the cache manager does not add a second timeout layer
/// on top. A slow backend simply delays the call proportionally.
///
/// # Example
///
/// ```ignore
/// use finsight_store::{SharedStore, StoreResult};
///
/// async fn probe(store: &dyn SharedStore, key: &str) -> StoreResult<bool> {
///     Ok(store.get(key).await?.is_some())
/// }
/// ```
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Reads the raw bytes stored under `key`.
    ///
    /// Returns `None` if the key is absent or its TTL has elapsed.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, expiring after `ttl`.
    ///
    /// Overwrites any existing value and resets the expiry.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()>;

    /// Applies a batch of TTL-bound writes, pipelined where the backend
    /// supports it.
    async fn set_many(&self, writes: &[StoreWrite]) -> StoreResult<()>;

    /// Deletes the given keys, returning how many were actually removed.
    async fn delete_keys(&self, keys: &[String]) -> StoreResult<u64>;

    /// Enumerates live keys matching a glob pattern (`*` matches any run,
    /// `?` matches one character).
    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Probes reachability of the store. Used by health checks only.
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for logs and health detail.
    fn backend_name(&self) -> &'static str;
}

/// Shared trait-object handle to a store backend.
pub type DynSharedStore = Arc<dyn SharedStore>;
