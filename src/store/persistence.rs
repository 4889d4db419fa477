//! Store implementations: JSON files on disk, or serialized JSON in memory.

use super::FilesystemStore;
use crate::error::StorageError;
use crate::tree::Filesystem;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FILESYSTEMS_DIR: &str = "filesystems";

fn check_host_name(host: &str) -> Result<(), StorageError> {
    if host.is_empty() || host.contains(['/', '\\']) || host == "." || host == ".." {
        return Err(StorageError::InvalidPath(format!(
            "host name {:?} cannot be used as a file name",
            host
        )));
    }
    Ok(())
}

fn decode(host: &str, json: &str) -> Result<Filesystem, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::Corrupt {
        host: host.to_string(),
        reason: e.to_string(),
    })
}

/// One pretty-printed JSON file per host under `<root>/filesystems/`.
///
/// Saves overwrite the file in place; there is no atomic rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn filesystems_dir(&self) -> PathBuf {
        self.root.join(FILESYSTEMS_DIR)
    }

    /// File holding `host`'s tree.
    pub fn path_for(&self, host: &str) -> Result<PathBuf, StorageError> {
        check_host_name(host)?;
        Ok(self.filesystems_dir().join(format!("{}.json", host)))
    }
}

impl FilesystemStore for JsonFileStore {
    fn load(&self, host: &str) -> Result<Option<Filesystem>, StorageError> {
        let path = self.path_for(host)?;
        if !path.exists() {
            tracing::debug!(host, path = %path.display(), "no saved filesystem");
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        let fs = decode(host, &json)?;
        tracing::debug!(host, path = %path.display(), "loaded filesystem");
        Ok(Some(fs))
    }

    fn save(&self, host: &str, fs: &Filesystem) -> Result<(), StorageError> {
        let path = self.path_for(host)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(fs)?;
        std::fs::write(&path, json)?;
        tracing::debug!(host, path = %path.display(), "saved filesystem");
        Ok(())
    }

    fn purge(&self) -> Result<usize, StorageError> {
        let dir = self.filesystems_dir();
        if !dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension() == Some(std::ffi::OsStr::new("json"))
            {
                std::fs::remove_file(path)?;
                removed += 1;
            }
        }
        tracing::info!(removed, dir = %dir.display(), "purged saved filesystems");
        Ok(removed)
    }
}

/// Keeps serialized trees in memory.
///
/// Trees still go through JSON so a load always returns a detached copy,
/// exactly as reading a file would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON saved for `host`, if any.
    pub fn raw(&self, host: &str) -> Option<String> {
        self.files.read().get(host).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl FilesystemStore for MemoryStore {
    fn load(&self, host: &str) -> Result<Option<Filesystem>, StorageError> {
        match self.files.read().get(host) {
            Some(json) => decode(host, json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, host: &str, fs: &Filesystem) -> Result<(), StorageError> {
        check_host_name(host)?;
        let json = serde_json::to_string(fs)?;
        self.files.write().insert(host.to_string(), json);
        Ok(())
    }

    fn purge(&self) -> Result<usize, StorageError> {
        let mut files = self.files.write();
        let removed = files.len();
        files.clear();
        Ok(removed)
    }
}
