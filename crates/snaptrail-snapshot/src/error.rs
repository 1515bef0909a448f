//! Snapshot error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot not found.
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// No dataset contains the given path.
    #[error("No dataset found for {}", .0.display())]
    NoDataset(PathBuf),

    /// A path could not be mapped because it lies outside the dataset.
    #[error("{} is not inside {}", path.display(), root.display())]
    OutsideDataset { path: PathBuf, root: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create an outside-dataset error.
    pub fn outside(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideDataset {
            path: path.into(),
            root: root.into(),
        }
    }
}
