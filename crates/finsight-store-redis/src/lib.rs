//! Redis-backed [`SharedStore`](finsight_store::SharedStore) implementation.
//!
//! Connections come from a `deadpool-redis` pool; the pool owns the timeout
//! discipline (wait/create bounds from [`RedisConfig`]), so callers never add
//! a second timeout layer. Pool acquisition failures surface as
//! `StoreError::Connection`, command failures as `StoreError::Command`.

mod config;
mod store;

pub use config::RedisConfig;
pub use store::RedisSharedStore;
