//! Filesystem node types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directory contents: child name to node, iterated in name order.
pub type Directory = BTreeMap<String, FsNode>;

/// Suffix marking a directory snapshot as an archive.
pub const ZIP_SUFFIX: &str = ".zip";

/// A single entry in a host filesystem.
///
/// Persisted as plain JSON: directories are objects, empty files are `null`,
/// text files are strings, media payloads are arrays of strings (one frame
/// each), and mission flags are booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FsNode {
    Directory(Directory),
    Text(String),
    Frames(Vec<String>),
    Flag(bool),
    Empty,
}

/// Kind of entry, used for listings and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Archive,
    File,
}

impl FsNode {
    pub fn empty_dir() -> Self {
        FsNode::Directory(Directory::new())
    }

    pub fn text(content: impl Into<String>) -> Self {
        FsNode::Text(content.into())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FsNode::Directory(_))
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_dir()
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            FsNode::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut Directory> {
        match self {
            FsNode::Directory(d) => Some(d),
            _ => None,
        }
    }

    /// Text content, if this is a text file with something in it.
    pub fn readable_text(&self) -> Option<&str> {
        match self {
            FsNode::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Number of direct children (0 for leaves).
    pub fn child_count(&self) -> usize {
        self.as_dir().map(|d| d.len()).unwrap_or(0)
    }

    /// Classify an entry stored under `name`.
    pub fn kind(&self, name: &str) -> EntryKind {
        if is_archive_name(name) {
            EntryKind::Archive
        } else if self.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

pub fn is_archive_name(name: &str) -> bool {
    name.len() > ZIP_SUFFIX.len() && name.ends_with(ZIP_SUFFIX)
}

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Pick a name not yet present in `dir`, appending `_1`, `_2`, ... to the
/// stem (before any extension) until it is free.
pub fn unique_name(dir: &Directory, desired: &str) -> String {
    if !dir.contains_key(desired) {
        return desired.to_string();
    }
    let (stem, ext) = match desired.rfind('.') {
        Some(idx) if idx > 0 => desired.split_at(idx),
        _ => (desired, ""),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}{}", stem, n, ext);
        if !dir.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
