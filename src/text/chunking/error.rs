//! Error types for recursive text chunking

/// Error types for chunking operations
#[derive(thiserror::Error, Debug)]
pub enum ChunkingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot read chunking config from env: {0}")]
    Environment(#[from] envy::Error),
}

/// Result type for chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

impl ChunkingError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if this error is recoverable
    ///
    /// Splitting is deterministic, so retrying with the same input never helps.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidArgument(_) | Self::Environment(_) => false,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Environment(_) => "environment",
        }
    }
}
