//! Two-tier caching for derived finsight artifacts.
//!
//! ## Architecture
//!
//! - **Local tier (DashMap)**: in-process, microsecond latency, per-instance
//! - **Shared tier ([`SharedStore`](finsight_store::SharedStore))**: network,
//!   millisecond latency, shared across instances
//!
//! ## Cache Hierarchy
//!
//! ```text
//! get request → local tier → shared tier → loader (caller-supplied)
//!                   ↓              ↓             ↓
//!               <1µs latency  ~5ms latency  recomputation
//! ```
//!
//! ## Graceful Degradation
//!
//! Every shared-tier failure is absorbed as a miss/no-op: a cache outage
//! costs latency and loader invocations, never request failures. The one
//! exception is a failing loader inside [`CacheManager::get_or_set`], which
//! is propagated verbatim - a failed computation must stay visible.

pub mod error;
pub mod health;
pub mod janitor;
pub mod local;
pub mod manager;
mod scheduler;
mod singleflight;

pub use error::{CacheError, CacheResult};
pub use health::{CacheHealth, HealthStatus};
pub use janitor::{Janitor, JanitorConfig};
pub use local::LocalStore;
pub use manager::{BatchEntry, BatchOutcome, CacheManager, WarmLoader, WarmRequest};
