//! Durable key-value storage
//!
//! The session write path only needs a narrow `get`/`set`/`remove` surface,
//! the same shape as browser local storage. `FileStore` persists the whole map
//! as JSON on every write; `MemoryStore` keeps it in process.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by the underlying storage medium
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A write (set or remove) could not be persisted
    #[error("failed to write storage key '{key}': {reason}")]
    Write { key: String, reason: String },
    /// The backing medium could not be read
    #[error("failed to read storage: {reason}")]
    Read { reason: String },
}

/// Key-value storage capability used by the session store
///
/// Implementations must be safe to share between request handlers.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing an absent key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
