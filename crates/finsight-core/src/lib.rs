pub mod artifact;
pub mod clock;
pub mod entry;
pub mod error;
pub mod key;
pub mod pattern;
pub mod policy;
pub mod stats;

pub use artifact::ArtifactType;
pub use clock::{Clock, DynClock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use error::{CoreError, ErrorCategory, Result};
pub use key::generate_key;
pub use pattern::glob_to_regex;
pub use policy::TypePolicy;
pub use stats::{CacheStats, StatsSnapshot};
