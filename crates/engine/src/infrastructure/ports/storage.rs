//! Key-value persistence for the campaign document.

use super::StorageError;

/// An opaque key-value store holding serialized documents.
///
/// A missing key is not an error: `load` returns `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
pub trait StorageProvider: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
