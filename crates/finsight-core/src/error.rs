use thiserror::Error;

/// Core error types for finsight cache operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid cache identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid artifact type: {0}")]
    InvalidArtifactType(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

impl CoreError {
    /// Create a new InvalidIdentifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a new InvalidArtifactType error
    pub fn invalid_artifact_type(name: impl Into<String>) -> Self {
        Self::InvalidArtifactType(name.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentifier(_) | Self::InvalidArtifactType(_) => ErrorCategory::Validation,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::RegexError(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_identifier("identifier must be non-empty");
        assert_eq!(
            err.to_string(),
            "Invalid cache identifier: identifier must be non-empty"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_invalid_artifact_type_error() {
        let err = CoreError::invalid_artifact_type("Not-A-Type");
        assert_eq!(err.to_string(), "Invalid artifact type: Not-A-Type");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_regex_error_conversion() {
        match regex::Regex::new("[") {
            Err(regex_err) => {
                let core_err: CoreError = regex_err.into();
                assert!(matches!(core_err, CoreError::RegexError(_)));
                assert_eq!(core_err.category(), ErrorCategory::System);
            }
            Ok(_) => panic!("Expected regex compilation to fail"),
        }
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
    }
}
