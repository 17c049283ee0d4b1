//! Shared types used by store backends.

use std::time::Duration;

/// One keyed write in a batched store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWrite {
    pub key: String,
    pub value: Vec<u8>,
    pub ttl: Duration,
}

impl StoreWrite {
    pub fn new(key: impl Into<String>, value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            value,
            ttl,
        }
    }
}
