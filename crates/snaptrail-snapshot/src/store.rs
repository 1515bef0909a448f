//! Snapshot store abstraction and the `.zfs` directory implementation.

use crate::{Dataset, Snapshot, SnapshotError, SnapshotResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Read-only access to the snapshots covering a live path.
///
/// Implementations must be cheap to call repeatedly; the browser asks again
/// on every directory change instead of caching.
pub trait SnapshotStore: Send + Sync {
    /// The dataset containing `path`, with its snapshots loaded.
    fn dataset_for(&self, path: &Path) -> SnapshotResult<Dataset>;

    /// Snapshots covering `path`, newest first.
    fn list_snapshots(&self, path: &Path) -> SnapshotResult<Vec<Arc<Snapshot>>> {
        Ok(self.dataset_for(path)?.snapshots)
    }

    /// Map a live path to its equivalent inside `snapshot`.
    fn map_to_snapshot_path(&self, live: &Path, snapshot: &Snapshot) -> SnapshotResult<PathBuf> {
        snapshot.to_snapshot_path(live)
    }

    /// Map a path inside `snapshot` back to the live tree.
    fn map_to_live_path(
        &self,
        snapshot_path: &Path,
        snapshot: &Snapshot,
    ) -> SnapshotResult<PathBuf> {
        snapshot.to_live_path(snapshot_path)
    }

    /// Whether `path` is store bookkeeping that should not be browsed.
    fn is_internal(&self, _path: &Path) -> bool {
        false
    }
}

/// Snapshot store backed by the `.zfs/snapshot` control directory.
///
/// Datasets come from an explicit list of mountpoints; paths outside every
/// configured mountpoint fall back to discovery by walking up the tree.
#[derive(Debug, Clone, Default)]
pub struct ZfsStore {
    /// Configured dataset mountpoints.
    mountpoints: Vec<PathBuf>,
}

impl ZfsStore {
    /// Create a store for the given mountpoints.
    pub fn new(mountpoints: Vec<PathBuf>) -> Self {
        Self { mountpoints }
    }

    /// Configured mountpoints.
    pub fn mountpoints(&self) -> &[PathBuf] {
        &self.mountpoints
    }

    /// Resolve the mountpoint responsible for `path`.
    ///
    /// The longest configured mountpoint prefix wins, so nested datasets
    /// resolve to the innermost one.
    pub fn mountpoint_for(&self, path: &Path) -> Option<PathBuf> {
        self.mountpoints
            .iter()
            .filter(|m| path.starts_with(m))
            .max_by_key(|m| m.components().count())
            .cloned()
            .or_else(|| Dataset::discover(path))
    }
}

impl SnapshotStore for ZfsStore {
    fn dataset_for(&self, path: &Path) -> SnapshotResult<Dataset> {
        let mountpoint = self
            .mountpoint_for(path)
            .ok_or_else(|| SnapshotError::NoDataset(path.to_path_buf()))?;
        debug!(path = %path.display(), mountpoint = %mountpoint.display(), "Resolved dataset");
        Dataset::open(mountpoint)
    }

    fn is_internal(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|n| n == ".zfs")
            && path
                .parent()
                .is_some_and(|parent| self.mountpoint_for(parent).as_deref() == Some(parent))
    }
}
