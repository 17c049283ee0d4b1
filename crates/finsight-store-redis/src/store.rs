use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use finsight_store::{SharedStore, StoreError, StoreResult, StoreWrite};
use redis::AsyncCommands;
use std::time::Duration;

/// Shared-store backend over a Redis connection pool.
pub struct RedisSharedStore {
    pool: Pool,
}

impl RedisSharedStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> StoreResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::connection(format!("Redis pool error: {e}")))
    }
}

#[async_trait]
impl SharedStore for RedisSharedStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| StoreError::command(format!("Redis GET error: {e}")))
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| StoreError::command(format!("Redis SETEX error: {e}")))
    }

    async fn set_many(&self, writes: &[StoreWrite]) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        // One pipelined round trip for the whole batch.
        let mut pipe = redis::pipe();
        for write in writes {
            pipe.set_ex(&write.key, write.value.as_slice(), write.ttl.as_secs())
                .ignore();
        }
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::command(format!("Redis pipelined SETEX error: {e}")))?;

        tracing::debug!(count = writes.len(), "pipelined batch write to Redis");
        Ok(())
    }

    async fn delete_keys(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection().await?;
        conn.del::<_, u64>(keys)
            .await
            .map_err(|e| StoreError::command(format!("Redis DEL error: {e}")))
    }

    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection().await?;
        conn.keys::<_, Vec<String>>(pattern)
            .await
            .map_err(|e| StoreError::command(format!("Redis KEYS error: {e}")))
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::command(format!("Redis PING error: {e}")))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
