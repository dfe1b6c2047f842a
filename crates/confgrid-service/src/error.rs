//! Error types for the config service.

use confgrid_core::CoreError;
use confgrid_state::StateError;
use thiserror::Error;

/// Result type alias for config service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Terminal outcomes of a failed save or poll.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submitted document is not a YAML mapping.
    #[error("invalid yaml: {0}")]
    InvalidYaml(#[source] CoreError),

    /// A record exists and the policy forbids touching it.
    #[error("config for {0} already exists")]
    AlreadyExists(String),

    /// Merging or route separation failed; nothing was written.
    #[error("transform failed: {0}")]
    Transform(#[source] CoreError),

    /// A stored blob could not be decoded at poll time.
    #[error("stored config is malformed: {0}")]
    Decode(#[source] CoreError),

    #[error("config not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StateError),
}
