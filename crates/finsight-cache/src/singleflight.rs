//! Per-key in-flight-computation registry.
//!
//! Collapses concurrent cache-aside loads for one key into a single loader
//! run: the first caller holds the key's flight lock while its loader runs,
//! waiters re-probe the cache after acquiring the lock and find the value
//! already populated.
//!
//! Best-effort only. The registry slot is dropped with the last guard, so two
//! loaders can still race across guard turnover; that matches the cache's
//! non-linearizable consistency model.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct FlightRegistry {
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the flight lock for `key`, creating the slot when absent.
    pub async fn lock(&self, key: &str) -> FlightGuard<'_> {
        let mutex = self
            .flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let permit = mutex.lock_owned().await;
        FlightGuard {
            registry: self,
            key: key.to_string(),
            _permit: permit,
        }
    }

    fn release(&self, key: &str) {
        // Two references mean registry slot + the dropping guard: no waiters
        // are left, so the slot can go.
        self.flights
            .remove_if(key, |_, mutex| Arc::strong_count(mutex) <= 2);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.flights.len()
    }
}

/// RAII permit on a key's flight. Dropping it releases the lock and clears
/// the registry slot once no other caller is waiting.
pub(crate) struct FlightGuard<'a> {
    registry: &'a FlightRegistry,
    key: String,
    _permit: OwnedMutexGuard<()>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
