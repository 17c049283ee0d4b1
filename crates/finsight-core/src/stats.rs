use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide cache counters. Reset only on process restart.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sets(&self, count: u64) {
        self.sets.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn total_requests(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Hit rate as a percentage with two-decimal precision, `"0.00"` before
    /// any request has been observed.
    pub fn hit_rate(&self) -> String {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            "0.00".to_string()
        } else {
            format!("{:.2}", hits as f64 * 100.0 / total as f64)
        }
    }

    /// Point-in-time copy of all counters for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            sets: self.sets(),
            evictions: self.evictions(),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Serializable view of the counters at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub hit_rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_with_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), "0.00");
        assert_eq!(stats.total_requests(), 0);
    }

    #[test]
    fn test_hit_rate_two_decimal_precision() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), "33.33");

        let stats = CacheStats::new();
        for _ in 0..3 {
            stats.record_hit();
        }
        stats.record_miss();
        assert_eq!(stats.hit_rate(), "75.00");
    }

    #[test]
    fn test_counters_accumulate() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_set();
        stats.record_sets(4);
        stats.record_evictions(7);

        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.sets(), 5);
        assert_eq!(stats.evictions(), 7);
        assert_eq!(stats.total_requests(), 2);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();

        let snapshot = stats.snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["hits"], 2);
        assert_eq!(value["hitRate"], "100.00");
        assert!(value.get("hit_rate").is_none());
    }
}
