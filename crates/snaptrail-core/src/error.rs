//! Error types for the core crate.

use snaptrail_snapshot::SnapshotError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Browsing error.
    #[error("browse error: {0}")]
    Browse(#[from] BrowseError),

    /// Snapshot store error.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// A value parsed but makes no sense.
    #[error("config validation failed: {message}")]
    Validation { message: String },

    /// Invalid path (e.g., could not determine config directory).
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Errors raised while listing or navigating directories.
///
/// None of these are fatal; the browser keeps its previous state and
/// reports the error to the status sink.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Listing a directory was denied.
    #[error("permission denied: {}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A navigation target does not exist.
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// A single entry could not be stat'ed.
    #[error("cannot stat {}: {source}", path.display())]
    StatFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A navigation target is not a directory.
    #[error("not a directory: {}", path.display())]
    InvalidTarget { path: PathBuf },

    /// Any other IO failure while listing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot store failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl BrowseError {
    /// Classify an IO error raised while accessing `path`.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::Permission {
                path: path.to_path_buf(),
                source: error,
            },
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io(error),
        }
    }

    /// The path the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Permission { path, .. }
            | Self::NotFound { path }
            | Self::StatFailure { path, .. }
            | Self::InvalidTarget { path } => Some(path),
            Self::Io(_) | Self::Snapshot(_) => None,
        }
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for browsing operations.
pub type BrowseResult<T> = Result<T, BrowseError>;
