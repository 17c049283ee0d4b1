//! Health reporting types.

use finsight_core::StatsSnapshot;
use serde::Serialize;

/// Overall cache health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// The shared tier is unreachable; the cache keeps serving from the
    /// local tier and loaders.
    Degraded,
}

/// Snapshot returned by [`CacheManager::health_check`](crate::CacheManager::health_check).
///
/// Stats and local entry count are always present; a degraded shared tier
/// must not prevent the health report itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub status: HealthStatus,
    pub shared_store_reachable: bool,
    pub stats: StatsSnapshot,
    pub local_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_core::CacheStats;

    #[test]
    fn test_serializes_lowercase_status_and_camel_case_fields() {
        let health = CacheHealth {
            status: HealthStatus::Degraded,
            shared_store_reachable: false,
            stats: CacheStats::new().snapshot(),
            local_entries: 3,
        };

        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value["status"], "degraded");
        assert_eq!(value["sharedStoreReachable"], false);
        assert_eq!(value["localEntries"], 3);
        assert_eq!(value["stats"]["hitRate"], "0.00");
    }
}
