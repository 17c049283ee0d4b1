//! Cascading invalidation scheduler.
//!
//! Derived artifacts (insights, recommendations, patterns) are only as fresh
//! as the source data that fed them. A write to a source type (`xero_data`,
//! `financial_summary`) therefore arms a one-shot cascade that fires once the
//! written entry's TTL elapses and purges every derived entry from both
//! tiers, even where a derived entry's own TTL has not run out yet.
//!
//! Cascades are best-effort and die with the process; the source entry's own
//! TTL independently forces a refetch after a restart.

use finsight_core::ArtifactType;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

pub(crate) struct InvalidationScheduler {
    shutdown: watch::Sender<bool>,
    armed: Arc<AtomicUsize>,
}

impl InvalidationScheduler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            armed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Glob patterns covering every derived artifact, from the typed policy
    /// table.
    pub fn derived_patterns() -> Vec<String> {
        ArtifactType::derived()
            .iter()
            .map(|artifact| format!("{}*", artifact.policy().key_prefix))
            .collect()
    }

    /// Arm a one-shot cascade firing `delay` after a source-type write.
    ///
    /// Non-source writes are ignored. The cascade races the shutdown channel,
    /// so `shutdown` cancels every timer still pending.
    pub fn arm<F, Fut>(&self, artifact: &ArtifactType, delay: Duration, invalidate: F)
    where
        F: FnOnce(Vec<String>) -> Fut + Send + 'static,
        Fut: Future<Output = u64> + Send,
    {
        if !artifact.is_source() {
            return;
        }

        let mut cancel = self.shutdown.subscribe();
        let armed = Arc::clone(&self.armed);
        armed.fetch_add(1, Ordering::SeqCst);
        let source = artifact.to_string();

        debug!(source = %source, delay_secs = delay.as_secs(), "armed cascading invalidation");
        tokio::spawn(async move {
            let fired = tokio::select! {
                _ = tokio::time::sleep(delay) => true,
                // Treat a dropped sender like an explicit shutdown.
                _ = cancel.changed() => false,
            };

            if fired {
                let removed = invalidate(Self::derived_patterns()).await;
                debug!(source = %source, removed, "cascading invalidation fired");
            } else {
                debug!(source = %source, "cascading invalidation cancelled");
            }
            armed.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Number of cascades currently pending.
    pub fn armed(&self) -> usize {
        self.armed.load(Ordering::SeqCst)
    }

    /// Cancel every pending cascade.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
