//! The cache manager: orchestrates get/set/invalidate across both tiers.

use crate::error::{CacheError, CacheResult};
use crate::health::{CacheHealth, HealthStatus};
use crate::local::LocalStore;
use crate::scheduler::InvalidationScheduler;
use crate::singleflight::FlightRegistry;
use finsight_core::{
    ArtifactType, CacheEntry, CacheStats, DynClock, StatsSnapshot, SystemClock, generate_key,
};
use finsight_store::{DynSharedStore, StoreWrite};
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared-tier reads that push `access_count` past this make the entry
/// eligible for local-tier placement.
const PROMOTION_THRESHOLD: u64 = 2;
/// Local horizon for promoted entries, as a fraction of the policy TTL.
const PROMOTION_TTL_FACTOR: f64 = 0.8;
/// Local horizon for freshly written promotable entries, as a fraction of the
/// resolved TTL. Shorter than the shared horizon so local entries are
/// refreshed by real reads before the shared entry expires.
const SEED_TTL_FACTOR: f64 = 0.5;

/// One entry of a [`CacheManager::batch_set`] request.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub artifact: ArtifactType,
    pub identifier: String,
    pub data: Value,
    pub context: HashMap<String, String>,
    pub custom_ttl: Option<Duration>,
}

/// Key and TTL actually written for one batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub key: String,
    pub ttl: Duration,
}

/// Identifies the artifact a warming loader computes.
#[derive(Debug, Clone)]
pub struct WarmRequest {
    pub artifact: ArtifactType,
    pub identifier: String,
    pub context: HashMap<String, String>,
    pub custom_ttl: Option<Duration>,
}

/// Boxed loader driven by [`CacheManager::warm`].
pub type WarmLoader = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<Option<Value>>> + Send>;

/// Two-tier cache manager for derived analytics artifacts.
///
/// Constructed explicitly with its shared tier (and optionally a clock)
/// injected, then passed by reference to consumers - never ambient global
/// state. The local tier and stats are owned here.
///
/// Consistency is best-effort, not linearizable: execution suspends at every
/// shared-tier call, so two logical operations on the same key can interleave
/// there, with last-write-wins at the shared store. Acceptable for a
/// derived/recomputable cache that is never a source of truth.
pub struct CacheManager {
    local: LocalStore,
    shared: DynSharedStore,
    clock: DynClock,
    stats: Arc<CacheStats>,
    scheduler: InvalidationScheduler,
    flights: FlightRegistry,
}

impl CacheManager {
    /// Create a manager over `shared`, running on the system clock.
    pub fn new(shared: DynSharedStore) -> Self {
        Self::with_clock(shared, Arc::new(SystemClock))
    }

    /// Create a manager with an injected clock, for deterministic TTL tests.
    pub fn with_clock(shared: DynSharedStore, clock: DynClock) -> Self {
        Self {
            local: LocalStore::new(Arc::clone(&clock)),
            shared,
            clock,
            stats: Arc::new(CacheStats::new()),
            scheduler: InvalidationScheduler::new(),
            flights: FlightRegistry::new(),
        }
    }

    /// Look up an artifact, local tier first.
    ///
    /// The only error is a key-codec contract violation. Shared-tier
    /// failures (connection, command, undecodable entry) are logged and
    /// degrade to a miss; callers observe "hit" or `None`, never an outage.
    pub async fn get(
        &self,
        artifact: &ArtifactType,
        identifier: &str,
        context: &HashMap<String, String>,
    ) -> CacheResult<Option<Value>> {
        let key = generate_key(artifact, identifier, context)?;

        if let Some(entry) = self.local.get(&key) {
            self.stats.record_hit();
            debug!(key = %key, "cache hit (local)");
            return Ok(Some(entry.data));
        }

        let bytes = match self.shared.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.stats.record_miss();
                debug!(key = %key, "cache miss");
                return Ok(None);
            }
            Err(e) => {
                self.stats.record_miss();
                warn!(key = %key, error = %e, "shared store GET failed, treating as miss");
                return Ok(None);
            }
        };

        let mut entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                self.stats.record_miss();
                warn!(key = %key, error = %e, "undecodable cache entry, treating as miss");
                return Ok(None);
            }
        };

        self.stats.record_hit();
        entry.access_count += 1;
        debug!(key = %key, access_count = entry.access_count, "cache hit (shared)");

        let policy = artifact.policy();
        if policy.promotable && entry.access_count > PROMOTION_THRESHOLD {
            self.local.put(
                &key,
                entry.clone(),
                fraction_of(policy.ttl, PROMOTION_TTL_FACTOR),
            );
            debug!(key = %key, "promoted to local tier");
        }

        // Read-refresh: re-persist the bumped entry at the full policy TTL,
        // so frequently read keys outlive their nominal TTL.
        match serde_json::to_vec(&entry) {
            Ok(refreshed) => {
                if let Err(e) = self.shared.set_with_ttl(&key, refreshed, policy.ttl).await {
                    warn!(key = %key, error = %e, "failed to refresh shared entry");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "failed to serialize refreshed entry"),
        }

        Ok(Some(entry.data))
    }

    /// Write an artifact through to the shared tier.
    ///
    /// `custom_ttl` overrides the policy TTL. Promotable types additionally
    /// seed the local tier at half the resolved TTL. Source-type writes arm
    /// the cascading invalidation of derived artifacts. Shared-tier failure
    /// yields `Ok(false)`; nothing else happens in that case.
    pub async fn set(
        &self,
        artifact: &ArtifactType,
        identifier: &str,
        data: Value,
        context: &HashMap<String, String>,
        custom_ttl: Option<Duration>,
    ) -> CacheResult<bool> {
        let key = generate_key(artifact, identifier, context)?;
        let policy = artifact.policy();
        let ttl = custom_ttl.unwrap_or(policy.ttl);

        let entry = CacheEntry::new(
            artifact.clone(),
            data,
            context.clone(),
            self.clock.now(),
        );

        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to serialize cache entry");
                return Ok(false);
            }
        };

        if let Err(e) = self.shared.set_with_ttl(&key, bytes, ttl).await {
            warn!(key = %key, error = %e, "shared store SETEX failed");
            return Ok(false);
        }

        if policy.promotable {
            self.local
                .put(&key, entry, fraction_of(ttl, SEED_TTL_FACTOR));
        }

        self.stats.record_set();
        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");

        let local = self.local.clone();
        let shared = Arc::clone(&self.shared);
        self.scheduler.arm(artifact, ttl, move |patterns| async move {
            purge(&local, &shared, &patterns).await
        });

        Ok(true)
    }

    /// Cache-aside: return the cached value, or run `loader` and cache its
    /// result.
    ///
    /// Concurrent calls for the same key are collapsed onto one loader run
    /// (single-flight). A loader failure is the one error propagated
    /// verbatim - a failed computation must not read as "no data". A loader
    /// returning `None` is returned as-is and never cached.
    pub async fn get_or_set<F, Fut>(
        &self,
        artifact: &ArtifactType,
        identifier: &str,
        context: &HashMap<String, String>,
        custom_ttl: Option<Duration>,
        loader: F,
    ) -> CacheResult<Option<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Option<Value>>>,
    {
        if let Some(value) = self.get(artifact, identifier, context).await? {
            return Ok(Some(value));
        }

        let key = generate_key(artifact, identifier, context)?;
        let _flight = self.flights.lock(&key).await;

        // Re-probe under the flight lock: a concurrent caller may have
        // populated the key while we waited. The initial probe already
        // recorded a miss, but the caller is served a value, so count the
        // hit. Promotion and read-refresh stay with regular gets.
        if let Some(value) = self.peek(&key).await {
            self.stats.record_hit();
            debug!(key = %key, "populated by concurrent flight");
            return Ok(Some(value));
        }

        let loaded = loader().await.map_err(CacheError::loader)?;
        match loaded {
            Some(value) => {
                // Best-effort persistence: the freshly computed value is
                // returned even when the shared write degrades.
                self.set(artifact, identifier, value.clone(), context, custom_ttl)
                    .await?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write a batch of artifacts in one pipelined shared-store round trip.
    ///
    /// The local tier and the invalidation scheduler are untouched: only
    /// individual `set` calls seed locally and arm cascades. On failure the
    /// batch returns empty and `sets` stays unchanged.
    pub async fn batch_set(&self, entries: &[BatchEntry]) -> CacheResult<Vec<BatchOutcome>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let mut writes = Vec::with_capacity(entries.len());
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let key = generate_key(&entry.artifact, &entry.identifier, &entry.context)?;
            let ttl = entry.custom_ttl.unwrap_or(entry.artifact.policy().ttl);
            let envelope = CacheEntry::new(
                entry.artifact.clone(),
                entry.data.clone(),
                entry.context.clone(),
                now,
            );

            match serde_json::to_vec(&envelope) {
                Ok(bytes) => {
                    writes.push(StoreWrite::new(key.clone(), bytes, ttl));
                    outcomes.push(BatchOutcome { key, ttl });
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "batch entry failed to serialize, batch aborted");
                    return Ok(Vec::new());
                }
            }
        }

        if let Err(e) = self.shared.set_many(&writes).await {
            warn!(count = writes.len(), error = %e, "batched shared store write failed");
            return Ok(Vec::new());
        }

        self.stats.record_sets(entries.len() as u64);
        debug!(count = entries.len(), "batch cache set");
        Ok(outcomes)
    }

    /// Precompute a batch of artifacts through caller-supplied loaders.
    ///
    /// Warming is bulk best-effort, unlike `get_or_set`: failed loaders and
    /// `None` results are logged and skipped, the survivors are bulk-written
    /// via [`Self::batch_set`]. Returns how many artifacts were cached.
    pub async fn warm(&self, batch: Vec<(WarmRequest, WarmLoader)>) -> CacheResult<usize> {
        let mut entries = Vec::with_capacity(batch.len());

        for (request, loader) in batch {
            match loader().await {
                Ok(Some(data)) => entries.push(BatchEntry {
                    artifact: request.artifact,
                    identifier: request.identifier,
                    data,
                    context: request.context,
                    custom_ttl: request.custom_ttl,
                }),
                Ok(None) => {
                    debug!(identifier = %request.identifier, "warm loader produced nothing, skipped");
                }
                Err(e) => {
                    warn!(identifier = %request.identifier, error = %e, "warm loader failed, skipped");
                }
            }
        }

        let outcomes = self.batch_set(&entries).await?;
        Ok(outcomes.len())
    }

    /// Remove every key matching the given glob patterns from both tiers.
    ///
    /// Never fails: a failure on one tier or pattern is logged and skipped,
    /// processing continues with the rest. Returns the grand total removed.
    pub async fn invalidate(&self, patterns: &[String]) -> u64 {
        purge(&self.local, &self.shared, patterns).await
    }

    /// Point-in-time snapshot of the process-wide counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of cascading invalidations currently armed.
    pub fn armed_invalidations(&self) -> usize {
        self.scheduler.armed()
    }

    /// Cancel every armed cascading invalidation.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    /// Probe shared-tier reachability and report current stats.
    ///
    /// A degraded shared tier never prevents the report itself.
    pub async fn health_check(&self) -> CacheHealth {
        let reachable = match self.shared.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.shared.backend_name(), error = %e, "shared store ping failed");
                false
            }
        };

        CacheHealth {
            status: if reachable {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            shared_store_reachable: reachable,
            stats: self.stats.snapshot(),
            local_entries: self.local.len(),
        }
    }

    /// Probe both tiers without stats, promotion or read-refresh side
    /// effects. Used for the re-probe under a flight lock.
    async fn peek(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.local.get(key) {
            return Some(entry.data);
        }
        match self.shared.get(key).await {
            Ok(Some(bytes)) => serde_json::from_slice::<CacheEntry>(&bytes)
                .ok()
                .map(|entry| entry.data),
            _ => None,
        }
    }

    pub(crate) fn local_handle(&self) -> LocalStore {
        self.local.clone()
    }

    pub(crate) fn stats_handle(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }
}

/// Delete every key matching `patterns` from both tiers, summing counts.
/// Failures are logged and skipped per tier and pattern.
pub(crate) async fn purge(
    local: &LocalStore,
    shared: &DynSharedStore,
    patterns: &[String],
) -> u64 {
    let mut removed = 0u64;

    for pattern in patterns {
        match shared.keys_matching(pattern).await {
            Ok(keys) if !keys.is_empty() => match shared.delete_keys(&keys).await {
                Ok(count) => removed += count,
                Err(e) => warn!(pattern = %pattern, error = %e, "shared store DEL failed"),
            },
            Ok(_) => {}
            Err(e) => warn!(pattern = %pattern, error = %e, "shared store KEYS failed"),
        }

        match local.delete_matching(pattern) {
            Ok(count) => removed += count,
            Err(e) => warn!(pattern = %pattern, error = %e, "invalid pattern for local tier"),
        }
    }

    removed
}

fn fraction_of(ttl: Duration, factor: f64) -> Duration {
    Duration::from_secs_f64(ttl.as_secs_f64() * factor)
}
