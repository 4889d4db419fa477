//! Host filesystem trees
//!
//! A [`Filesystem`] is one host's whole tree. It persists as `{"/": tree}`
//! and always has a directory at the root.

pub mod node;
pub mod path;

pub use node::{Directory, EntryKind, FsNode};

use crate::error::PathError;
use crate::game_state::{GameStates, GameStatesMut};
use serde::{Deserialize, Serialize};

/// Top-level directories created on a fresh host.
pub const BASE_DIRECTORIES: &[&str] = &[
    "bin", "dev", "etc", "home", "lib", "mnt", "opt", "proc", "root", "sbin", "srv", "sys",
    "tmp", "usr", "var",
];

/// Directories seeded into every new home directory.
pub const HOME_SKELETON: &[&str] = &[
    "Desktop",
    "Documents",
    "Downloads",
    "Movies",
    "Music",
    "Pictures",
];

pub const HOME_DIR: &str = "/home";
pub const PASSWD_DIR: &str = "/etc";
pub const PASSWD_FILE: &str = ".passwd";

/// Persisted layout of a filesystem.
#[derive(Serialize, Deserialize)]
struct PersistedTree {
    #[serde(rename = "/")]
    root: FsNode,
}

/// One host's filesystem tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedTree", into = "PersistedTree")]
pub struct Filesystem {
    root: FsNode,
}

impl TryFrom<PersistedTree> for Filesystem {
    type Error = String;

    fn try_from(value: PersistedTree) -> Result<Self, Self::Error> {
        Filesystem::from_root(value.root)
    }
}

impl From<Filesystem> for PersistedTree {
    fn from(value: Filesystem) -> Self {
        PersistedTree { root: value.root }
    }
}

impl Default for Filesystem {
    fn default() -> Self {
        Self {
            root: FsNode::empty_dir(),
        }
    }
}

impl Filesystem {
    /// Wrap an existing tree; the root must be a directory.
    pub fn from_root(root: FsNode) -> Result<Self, String> {
        if !root.is_dir() {
            return Err("root of a filesystem must be a directory".to_string());
        }
        Ok(Self { root })
    }

    /// Build the structure every fresh host starts with.
    ///
    /// `/bin` gets one placeholder entry per built-in command.
    pub fn with_base_structure<'a>(commands: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fs = Self::default();
        let root = fs.root_dir_mut();
        for name in BASE_DIRECTORIES {
            root.insert((*name).to_string(), FsNode::empty_dir());
        }
        if let Some(FsNode::Directory(bin)) = root.get_mut("bin") {
            for command in commands {
                bin.insert(command.to_string(), FsNode::Empty);
            }
        }
        if let Some(FsNode::Directory(etc)) = root.get_mut("etc") {
            etc.insert(PASSWD_FILE.to_string(), FsNode::text(""));
        }
        fs
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    pub fn root_dir(&self) -> &Directory {
        match &self.root {
            FsNode::Directory(d) => d,
            _ => unreachable!("filesystem root is always a directory"),
        }
    }

    pub fn root_dir_mut(&mut self) -> &mut Directory {
        match &mut self.root {
            FsNode::Directory(d) => d,
            _ => unreachable!("filesystem root is always a directory"),
        }
    }

    /// Resolve `path` relative to `cwd`.
    pub fn resolve(&self, cwd: &str, target: &str) -> Result<&FsNode, PathError> {
        path::resolve(&self.root, cwd, target)
    }

    pub fn resolve_mut(&mut self, cwd: &str, target: &str) -> Result<&mut FsNode, PathError> {
        path::resolve_mut(&mut self.root, cwd, target)
    }

    /// Non-failing lookup of an absolute path.
    pub fn get_node(&self, abs: &str) -> Option<&FsNode> {
        self.resolve("/", abs).ok()
    }

    pub fn get_node_mut(&mut self, abs: &str) -> Option<&mut FsNode> {
        self.resolve_mut("/", abs).ok()
    }

    pub fn exists(&self, abs: &str) -> bool {
        self.get_node(abs).is_some()
    }

    /// The directory at `abs`, failing if it is missing or a file.
    pub fn dir_mut(&mut self, abs: &str) -> Result<&mut Directory, PathError> {
        let node = self.resolve_mut("/", abs)?;
        match node {
            FsNode::Directory(d) => Ok(d),
            _ => Err(PathError::NotADirectory(
                path::split_parent(abs)
                    .map(|(_, name)| name)
                    .unwrap_or_else(|| "/".to_string()),
            )),
        }
    }

    /// Make sure every segment of `abs` exists as a directory, creating
    /// missing ones. Fails if a segment already exists as a file.
    pub fn ensure_dir(&mut self, abs: &str) -> Result<&mut Directory, PathError> {
        let segs = path::segments("/", abs);
        let mut current = self.root_dir_mut();
        for seg in segs {
            let entry = current
                .entry(seg.clone())
                .or_insert_with(FsNode::empty_dir);
            current = match entry {
                FsNode::Directory(d) => d,
                _ => return Err(PathError::NotADirectory(seg)),
            };
        }
        Ok(current)
    }

    /// Insert or replace `filename` inside `dir`, creating `dir` if needed.
    pub fn add_file(&mut self, dir: &str, filename: &str, content: FsNode) -> Result<(), PathError> {
        let parent = self.ensure_dir(dir)?;
        parent.insert(filename.to_string(), content);
        Ok(())
    }

    /// Detach the entry at `abs` from its parent.
    pub fn remove(&mut self, abs: &str) -> Option<FsNode> {
        let (parent, name) = path::split_parent(abs)?;
        let dir = self.dir_mut(&parent).ok()?;
        dir.remove(&name)
    }

    /// The host-wide password (empty when unset).
    pub fn password(&self) -> &str {
        match self.get_node(&path::join(PASSWD_DIR, PASSWD_FILE)) {
            Some(FsNode::Text(s)) => s,
            _ => "",
        }
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), PathError> {
        self.add_file(PASSWD_DIR, PASSWD_FILE, FsNode::text(password))
    }

    /// Names of every entry under `/home`, in order.
    pub fn home_entries(&self) -> Vec<String> {
        match self.get_node(HOME_DIR) {
            Some(FsNode::Directory(d)) => d.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Create `/home/<username>` with the standard skeleton.
    pub fn create_home(&mut self, username: &str) -> Result<(), PathError> {
        let home = self.ensure_dir(&home_path(username))?;
        for name in HOME_SKELETON {
            home.entry((*name).to_string())
                .or_insert_with(FsNode::empty_dir);
        }
        Ok(())
    }

    pub fn game_states(&self) -> GameStates<'_> {
        GameStates::new(self)
    }

    pub fn game_states_mut(&mut self) -> GameStatesMut<'_> {
        GameStatesMut::new(self)
    }
}

/// Home directory path for `username`.
pub fn home_path(username: &str) -> String {
    path::join(HOME_DIR, username)
}
