//! Error types for the configuration transforms.

use thiserror::Error;

/// Result type alias for transform operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while decoding, transforming, or re-encoding documents.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid yaml: {0}")]
    Decode(String),

    #[error("yaml document must be a mapping, got {0}")]
    NotAMapping(&'static str),

    #[error("failed to serialize yaml: {0}")]
    Encode(String),
}
