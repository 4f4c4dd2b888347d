//! Error types for vidimus-storage

use thiserror::Error;

/// Result type alias for vidimus-storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vidimus-storage
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from vidimus-core
    #[error("Core error: {0}")]
    Core(#[from] vidimus_core::Error),

    /// The backing store failed or timed out.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Convenience constructor for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
