//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("settings repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepositoryError {
    /// True when the stored bytes exist but could not be decoded.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
