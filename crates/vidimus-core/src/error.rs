//! Error types for vidimus-core

use thiserror::Error;

/// Result type alias for vidimus-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vidimus-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A stored value could not be parsed into its typed form.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An identifier was malformed.
    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] uuid::Error),
}

impl Error {
    /// Convenience constructor for parse errors.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
