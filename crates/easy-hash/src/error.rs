//! Error types for hashing.

use easy_hash_digest::DigestError;
use thiserror::Error;

/// Input rejected by a strict entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot hash value of type: {found}")]
    NotABuffer { found: &'static str },
}

/// Errors that can occur while hashing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The digest provider failed, e.g. on an unknown algorithm name.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),
}

/// Result type for hashing operations.
pub type Result<T> = std::result::Result<T, HashError>;
