use crate::artifact::ArtifactType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Envelope stored in both cache tiers.
///
/// The shared tier holds the JSON encoding of this struct; the local tier
/// holds it in memory. `access_count` is bumped on every shared-tier hit and
/// drives promotion into the local tier; local hits do not mutate it, since a
/// local entry is already promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Opaque payload; business semantics live with the caller.
    pub data: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub cached_at: OffsetDateTime,
    pub access_count: u64,
    /// Context map the key was built from, kept for introspection.
    pub context: HashMap<String, String>,
    pub artifact_type: ArtifactType,
}

impl CacheEntry {
    /// Create a fresh entry with a zero access count.
    pub fn new(
        artifact_type: ArtifactType,
        data: Value,
        context: HashMap<String, String>,
        cached_at: OffsetDateTime,
    ) -> Self {
        Self {
            data,
            cached_at,
            access_count: 0,
            context,
            artifact_type,
        }
    }
}
