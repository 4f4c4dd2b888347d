//! Error types for vidimus-board

use thiserror::Error;

/// Result type alias for vidimus-board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vidimus-board
///
/// Bad request inputs never appear here; they are normalized to defaults
/// during [`crate::BoardRequest::normalize`]. Only genuine backend failures
/// propagate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from vidimus-core
    #[error("Core error: {0}")]
    Core(#[from] vidimus_core::Error),

    /// Error from vidimus-storage
    #[error("Storage error: {0}")]
    Storage(#[from] vidimus_storage::Error),
}
