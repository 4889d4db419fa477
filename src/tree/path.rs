//! Path resolution against a host filesystem tree.
//!
//! Paths are resolved lexically: absolute paths start at the root, relative
//! paths are joined onto the current working directory first. Empty and `.`
//! segments are dropped and `..` pops a segment, never climbing above `/`.

use crate::error::PathError;
use crate::tree::node::FsNode;

/// Split a path into its normalized segments, relative to `cwd`.
pub fn segments(cwd: &str, path: &str) -> Vec<String> {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", cwd, path)
    };
    let mut out: Vec<String> = Vec::new();
    for component in joined.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                out.pop();
            }
            other => out.push(other.to_string()),
        }
    }
    out
}

/// Render segments back into an absolute path.
pub fn to_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Normalize `path` against `cwd` into an absolute path string.
pub fn normalize(cwd: &str, path: &str) -> String {
    to_path(&segments(cwd, path))
}

/// Split an absolute normalized path into (parent, name).
///
/// Returns `None` for the root.
pub fn split_parent(path: &str) -> Option<(String, String)> {
    let mut segs = segments("/", path);
    let name = segs.pop()?;
    Some((to_path(&segs), name))
}

/// Join a child name onto a directory path.
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

/// Walk pre-split segments down from `root`.
pub fn walk<'a>(root: &'a FsNode, segments: &[String]) -> Result<&'a FsNode, PathError> {
    let mut current = root;
    let mut previous: Option<&str> = None;
    for seg in segments {
        let dir = current.as_dir().ok_or_else(|| {
            PathError::NotADirectory(previous.unwrap_or("/").to_string())
        })?;
        current = dir
            .get(seg)
            .ok_or_else(|| PathError::NotFound(seg.clone()))?;
        previous = Some(seg);
    }
    Ok(current)
}

/// Mutable twin of [`walk`].
pub fn walk_mut<'a>(
    root: &'a mut FsNode,
    segments: &[String],
) -> Result<&'a mut FsNode, PathError> {
    let mut current = root;
    let mut previous: Option<&str> = None;
    for seg in segments {
        let prev_name = previous.unwrap_or("/").to_string();
        let dir = current
            .as_dir_mut()
            .ok_or(PathError::NotADirectory(prev_name))?;
        current = dir
            .get_mut(seg)
            .ok_or_else(|| PathError::NotFound(seg.clone()))?;
        previous = Some(seg);
    }
    Ok(current)
}

/// Resolve `path` (absolute, or relative to `cwd`) to a node.
pub fn resolve<'a>(root: &'a FsNode, cwd: &str, path: &str) -> Result<&'a FsNode, PathError> {
    walk(root, &segments(cwd, path))
}

/// Resolve `path` to a mutable node.
pub fn resolve_mut<'a>(
    root: &'a mut FsNode,
    cwd: &str,
    path: &str,
) -> Result<&'a mut FsNode, PathError> {
    walk_mut(root, &segments(cwd, path))
}
