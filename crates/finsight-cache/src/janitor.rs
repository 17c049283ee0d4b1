//! Background sweep and reporting loop over the local tier.

use crate::local::LocalStore;
use crate::manager::CacheManager;
use finsight_core::CacheStats;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

/// Janitor timer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Seconds between expired-entry sweeps of the local tier
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Seconds between aggregate statistics reports
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_report_interval_secs() -> u64 {
    3600
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

impl JanitorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sweep_interval_secs == 0 {
            return Err("janitor.sweep_interval_secs must be greater than zero".to_string());
        }
        if self.report_interval_secs == 0 {
            return Err("janitor.report_interval_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Periodic maintenance task: sweeps expired local entries and reports
/// aggregate statistics. Purely observational apart from the sweep; it never
/// touches the shared tier.
pub struct Janitor {
    local: LocalStore,
    stats: Arc<CacheStats>,
    config: JanitorConfig,
}

impl Janitor {
    /// Zero intervals are rejected here: `tokio::time::interval` panics on a
    /// zero period, and inside the spawned task that would be unobservable.
    pub fn new(manager: &CacheManager, config: JanitorConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            local: manager.local_handle(),
            stats: manager.stats_handle(),
            config,
        })
    }

    /// Spawn the janitor task. Send `true` through the returned channel (or
    /// drop the sender) to stop it.
    pub fn start(self) -> watch::Sender<bool> {
        let (shutdown, mut rx) = watch::channel(false);

        tokio::spawn(async move {
            let mut sweep = interval(Duration::from_secs(self.config.sweep_interval_secs));
            let mut report = interval(Duration::from_secs(self.config.report_interval_secs));
            // Consume the immediate first ticks so the first sweep lands one
            // full interval after start.
            sweep.tick().await;
            report.tick().await;

            loop {
                tokio::select! {
                    _ = sweep.tick() => {
                        let evicted = self.local.sweep();
                        self.stats.record_evictions(evicted);
                        if evicted > 0 {
                            debug!(evicted, "swept expired local entries");
                        }
                    }
                    _ = report.tick() => {
                        info!(
                            hit_rate = %self.stats.hit_rate(),
                            local_entries = self.local.len(),
                            total_requests = self.stats.total_requests(),
                            "cache statistics"
                        );
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("janitor stopped");
        });

        shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_core::{ArtifactType, CacheEntry, Clock, ManualClock};
    use finsight_store_memory::MemorySharedStore;
    use serde_json::json;
    use std::collections::HashMap;
    use time::macros::datetime;

    #[test]
    fn test_config_defaults() {
        let config = JanitorConfig::default();
        assert_eq!(config.sweep_interval_secs, 300);
        assert_eq!(config.report_interval_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config: JanitorConfig = toml::from_str("sweep_interval_secs = 60").unwrap();
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.report_interval_secs, 3600);
    }

    #[test]
    fn test_config_validation() {
        let config = JanitorConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("sweep_interval"));

        let config = JanitorConfig {
            report_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("report_interval"));
    }

    #[tokio::test]
    async fn test_new_rejects_zero_intervals() {
        let clock = ManualClock::new(datetime!(2024-03-01 12:00:00 UTC));
        let manager = CacheManager::with_clock(
            Arc::new(MemorySharedStore::with_clock(Arc::new(clock.clone()))),
            Arc::new(clock),
        );

        let err = Janitor::new(
            &manager,
            JanitorConfig {
                sweep_interval_secs: 0,
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(err.contains("sweep_interval"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_evicts_and_counts() {
        let clock = ManualClock::new(datetime!(2024-03-01 12:00:00 UTC));
        let manager = CacheManager::with_clock(
            Arc::new(MemorySharedStore::with_clock(Arc::new(clock.clone()))),
            Arc::new(clock.clone()),
        );

        // Plant a local entry directly and let it expire on the manual clock.
        manager.local_handle().put(
            "insights:stale",
            CacheEntry::new(
                ArtifactType::Insights,
                json!(1),
                HashMap::new(),
                clock.now(),
            ),
            Duration::from_secs(30),
        );
        clock.advance(Duration::from_secs(31));

        let janitor = Janitor::new(
            &manager,
            JanitorConfig {
                sweep_interval_secs: 10,
                report_interval_secs: 3600,
            },
        )
        .unwrap();
        let shutdown = janitor.start();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(manager.local_handle().len(), 0);
        assert_eq!(manager.stats().evictions, 1);

        shutdown.send(true).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_loop() {
        let clock = ManualClock::new(datetime!(2024-03-01 12:00:00 UTC));
        let manager = CacheManager::with_clock(
            Arc::new(MemorySharedStore::with_clock(Arc::new(clock.clone()))),
            Arc::new(clock.clone()),
        );

        let janitor = Janitor::new(&manager, JanitorConfig::default()).unwrap();
        let shutdown = janitor.start();
        shutdown.send(true).unwrap();

        // Entry planted after shutdown is never swept, even past the interval.
        manager.local_handle().put(
            "insights:stale",
            CacheEntry::new(
                ArtifactType::Insights,
                json!(1),
                HashMap::new(),
                clock.now(),
            ),
            Duration::from_secs(30),
        );
        clock.advance(Duration::from_secs(31));
        tokio::time::sleep(Duration::from_secs(600)).await;

        assert_eq!(manager.local_handle().len(), 1);
        assert_eq!(manager.stats().evictions, 0);
    }
}
