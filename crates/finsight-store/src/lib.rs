//! # finsight-store
//!
//! Shared (tier-2) cache store abstraction for the finsight cache.
//!
//! This crate defines the traits and types that shared-store backends must
//! implement. It does not contain any implementations - those are provided by
//! separate crates (`finsight-store-memory`, `finsight-store-redis`).
//!
//! ## Overview
//!
//! The main trait is [`SharedStore`], which defines the consumed contract of
//! the shared cache service:
//! - Per-key reads and TTL-bound writes
//! - A pipelined batch write for bulk precomputation
//! - Glob-pattern key enumeration and bulk delete
//! - Reachability probing for health checks
//!
//! Every operation may fail independently of cache logic; the cache manager
//! absorbs those failures as misses/no-ops rather than surfacing them.

mod error;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use traits::{DynSharedStore, SharedStore};
pub use types::StoreWrite;
