use finsight_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the cache manager.
///
/// Deliberately narrow: shared-tier failures are absorbed inside the manager
/// and never reach callers. Only key-codec contract violations and loader
/// failures cross the boundary.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Caller contract violation at the key codec boundary.
    #[error("Cache key error: {0}")]
    Key(#[from] CoreError),

    /// A caller-supplied loader failed inside `get_or_set`.
    #[error("Loader failed: {0}")]
    Loader(#[source] anyhow::Error),
}

impl CacheError {
    /// Wrap a loader failure.
    pub fn loader(err: impl Into<anyhow::Error>) -> Self {
        Self::Loader(err.into())
    }
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_error_from_core() {
        let err: CacheError = CoreError::invalid_identifier("empty identifier").into();
        assert!(matches!(err, CacheError::Key(_)));
        assert!(err.to_string().contains("empty identifier"));
    }

    #[test]
    fn test_loader_error_keeps_source() {
        use std::error::Error;

        let err = CacheError::loader(anyhow::anyhow!("analytics backend unavailable"));
        assert!(err.to_string().contains("analytics backend unavailable"));
        assert!(err.source().is_some());
    }
}
