//! Engine startup and runtime errors.

use thiserror::Error;

/// Errors surfaced by the service binary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(#[from] collector_core::ConfigError),

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Storage(#[from] collector_store::StorageError),
}
