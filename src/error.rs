//! Error types for the filesystem, persistence, and shell layers.

use thiserror::Error;

/// Failure while walking a path through a host filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment was absent from its parent directory
    #[error("{0}: No such file or directory")]
    NotFound(String),

    /// A segment was addressed as a directory but holds file content
    #[error("{0} is a file, not a directory")]
    NotADirectory(String),
}

impl PathError {
    /// The offending path segment.
    pub fn segment(&self) -> &str {
        match self {
            PathError::NotFound(s) | PathError::NotADirectory(s) => s,
        }
    }
}

/// Persistence failures (load/save of host filesystems).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt filesystem for host {host}: {reason}")]
    Corrupt { host: String, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Errors surfaced by shell commands and host operations.
///
/// Everything except [`ShellError::Storage`], [`ShellError::Input`] and
/// [`ShellError::Config`] is an expected, user-facing condition.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("{0}: Permission denied")]
    Protected(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// The target exists but is the wrong kind of entry for the command
    #[error("{0}")]
    InvalidTarget(String),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("ssh: connect to host {0} port 22: Connection refused")]
    ConnectionFailed(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    SessionState(String),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("input error: {0}")]
    Input(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ShellError {
    /// Whether the error is an expected outcome of user input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ShellError::Storage(_) | ShellError::Input(_) | ShellError::Config(_)
        )
    }
}

impl From<config::ConfigError> for ShellError {
    fn from(err: config::ConfigError) -> Self {
        ShellError::Config(err.to_string())
    }
}
