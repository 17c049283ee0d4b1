use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Time source injected into every TTL decision.
///
/// Production code uses [`SystemClock`]; tests drive expiry deterministically
/// with [`ManualClock`] instead of sleeping.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> OffsetDateTime;
}

/// Shared trait-object handle to a clock.
pub type DynClock = Arc<dyn Clock>;

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same instant, so a test can hand one clone to the cache
/// and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<OffsetDateTime>>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.write();
        *now += delta;
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, to: OffsetDateTime) {
        *self.now.write() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.read()
    }
}
