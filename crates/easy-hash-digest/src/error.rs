//! Error types for digest providers.

use thiserror::Error;

/// Errors a digest provider can report. Never retried by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("digest provider failed: {0}")]
    Provider(String),
}

/// Result type for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
