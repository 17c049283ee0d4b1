//! Error types for shared-store backends.

/// Errors that can occur while talking to the shared cache store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to reach the store or acquire a connection.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The store rejected or failed a command.
    #[error("Command error: {message}")]
    Command {
        /// Description of the command failure.
        message: String,
    },

    /// The store did not answer within the backend's timeout budget.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timed-out operation.
        message: String,
    },

    /// An internal backend error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Command` error.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error indicates the store itself is unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Error category for logging/monitoring.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::Command { .. } => "command",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
