//! Error types for port operations.

/// Persistence failures reported by a storage adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached or the key is unusable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the store's capacity.
    #[error("Storage quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    /// Underlying I/O failed - includes the operation for tracing.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A stored value exists but cannot be read back.
    #[error("Stored value under {key} is corrupted: {reason}")]
    Corrupted { key: String, reason: String },
}

impl StorageError {
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn corrupted(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupted {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
