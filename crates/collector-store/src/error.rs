//! Error type for the storage layer.
//!
//! Backend-specific failures ([`sqlx`], [`fred`], I/O, serialization) are
//! folded into four operation-shaped variants so callers reason about
//! what failed, not which driver failed.

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend could not be opened or reached.
    #[error("storage connect failed: {0}")]
    ConnectFailed(String),

    /// A read from the backend failed.
    #[error("storage read failed: {0}")]
    ReadFailed(String),

    /// A write to the backend failed.
    #[error("storage write failed: {0}")]
    WriteFailed(String),

    /// A single stored record could not be decoded.
    ///
    /// Bulk loads never surface this variant; they skip the record and
    /// log. It is reported for single-record paths.
    #[error("record corrupt ({key}): {reason}")]
    RecordCorrupt {
        /// Backend-specific key of the offending record.
        key: String,
        /// Why decoding failed.
        reason: String,
    },
}

impl StorageError {
    /// Wrap a connection-phase error.
    pub fn connect<E: core::fmt::Display>(err: E) -> Self {
        Self::ConnectFailed(err.to_string())
    }

    /// Wrap a read-phase error.
    pub fn read<E: core::fmt::Display>(err: E) -> Self {
        Self::ReadFailed(err.to_string())
    }

    /// Wrap a write-phase error.
    pub fn write<E: core::fmt::Display>(err: E) -> Self {
        Self::WriteFailed(err.to_string())
    }
}
