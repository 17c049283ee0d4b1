use deadpool_redis::{Config as PoolConfig, Pool, Runtime};
use finsight_store::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis configuration for the shared cache tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Enable Redis (deployments without it fall back to the memory store)
    /// Default: false (disabled for single-instance deployments)
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

impl RedisConfig {
    /// Validate invariants before building a pool.
    pub fn validate(&self) -> Result<(), String> {
        if self.pool_size == 0 {
            return Err("redis.pool_size must be greater than zero".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("redis.timeout_ms must be greater than zero".to_string());
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(format!(
                "redis.url must start with redis:// or rediss://, got '{}'",
                self.url
            ));
        }
        Ok(())
    }

    /// Build a connection pool from this configuration.
    ///
    /// Connections are created lazily; no I/O happens here.
    pub fn create_pool(&self) -> StoreResult<Pool> {
        self.validate().map_err(StoreError::internal)?;

        let timeout = Duration::from_millis(self.timeout_ms);
        PoolConfig::from_url(&self.url)
            .builder()
            .map_err(|e| StoreError::connection(format!("invalid Redis pool config: {e}")))?
            .max_size(self.pool_size)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::connection(format!("failed to build Redis pool: {e}")))
    }
}
