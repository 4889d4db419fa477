//! Filesystem Store
//!
//! Durable storage for host filesystems. Each host's whole tree is saved and
//! loaded as a unit, keyed by host name.

pub mod persistence;

pub use persistence::{JsonFileStore, MemoryStore};

use crate::error::StorageError;
use crate::tree::Filesystem;

/// Filesystem store interface
pub trait FilesystemStore: Send + Sync {
    /// Load a host's tree; `Ok(None)` when nothing was saved yet.
    fn load(&self, host: &str) -> Result<Option<Filesystem>, StorageError>;
    /// Overwrite a host's saved tree.
    fn save(&self, host: &str, fs: &Filesystem) -> Result<(), StorageError>;
    /// Delete every saved tree. Returns how many were removed.
    fn purge(&self) -> Result<usize, StorageError>;
}
