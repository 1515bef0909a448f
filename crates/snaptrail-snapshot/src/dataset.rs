//! Datasets and snapshot enumeration.

use crate::{Snapshot, SnapshotResult};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Location of the snapshot control directory relative to a mountpoint.
pub const SNAPSHOT_DIR: &str = ".zfs/snapshot";

/// A mounted dataset and the snapshots taken of it.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display name (last mountpoint component, `/` for the root).
    pub name: String,

    /// Where the dataset is mounted.
    pub mountpoint: PathBuf,

    /// Snapshots, newest first.
    pub snapshots: Vec<Arc<Snapshot>>,
}

impl Dataset {
    /// Create a dataset without loading its snapshots.
    pub fn new(mountpoint: impl Into<PathBuf>) -> Self {
        let mountpoint = mountpoint.into();
        let name = mountpoint
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| mountpoint.display().to_string());
        Self {
            name,
            mountpoint,
            snapshots: Vec::new(),
        }
    }

    /// Create a dataset and load its snapshot list.
    pub fn open(mountpoint: impl Into<PathBuf>) -> SnapshotResult<Self> {
        let mut dataset = Self::new(mountpoint);
        dataset.snapshots = dataset.read_snapshots()?;
        Ok(dataset)
    }

    /// Find the dataset mountpoint for a path by walking up the tree.
    ///
    /// Returns the first ancestor (including `start`) that has a
    /// `.zfs/snapshot` directory.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(SNAPSHOT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Directory that holds one subdirectory per snapshot.
    pub fn snapshot_root(&self) -> PathBuf {
        self.mountpoint.join(SNAPSHOT_DIR)
    }

    /// Find a loaded snapshot by name.
    pub fn find_snapshot(&self, name: &str) -> Option<&Arc<Snapshot>> {
        self.snapshots.iter().find(|s| s.name == name)
    }

    /// Read the snapshot control directory.
    fn read_snapshots(&self) -> SnapshotResult<Vec<Arc<Snapshot>>> {
        let root = self.snapshot_root();
        let mut snapshots = Vec::new();

        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();
            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to stat snapshot");
                    continue;
                }
            };
            if !metadata.is_dir() {
                continue;
            }

            let created = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| DateTime::<Utc>::from(std::time::UNIX_EPOCH));
            let name = entry.file_name().to_string_lossy().to_string();
            snapshots.push(Arc::new(Snapshot::new(
                &self.mountpoint,
                name,
                path,
                created,
            )));
        }

        // Newest first, name breaks ties so the order is stable
        snapshots.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(
            dataset = %self.mountpoint.display(),
            count = snapshots.len(),
            "Loaded snapshots"
        );

        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_walks_up() {
        let dir = tempdir().unwrap();
        let mount = dir.path().join("tank");
        fs::create_dir_all(mount.join(SNAPSHOT_DIR)).unwrap();
        fs::create_dir_all(mount.join("a/b")).unwrap();

        assert_eq!(Dataset::discover(&mount.join("a/b")), Some(mount.clone()));
        assert_eq!(Dataset::discover(&mount), Some(mount));
    }

    #[test]
    fn test_discover_none() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain");
        fs::create_dir_all(&plain).unwrap();
        // A tempdir can in theory live on a ZFS dataset; only assert that we
        // never report the plain directory itself.
        assert_ne!(Dataset::discover(&plain), Some(plain));
    }

    #[test]
    fn test_open_lists_snapshot_dirs_only() {
        let dir = tempdir().unwrap();
        let mount = dir.path().join("tank");
        fs::create_dir_all(mount.join(SNAPSHOT_DIR).join("one")).unwrap();
        fs::create_dir_all(mount.join(SNAPSHOT_DIR).join("two")).unwrap();
        fs::write(mount.join(SNAPSHOT_DIR).join("stray"), "x").unwrap();

        let dataset = Dataset::open(&mount).unwrap();
        assert_eq!(dataset.name, "tank");
        assert_eq!(dataset.snapshots.len(), 2);
        assert!(dataset.find_snapshot("one").is_some());
        assert!(dataset.find_snapshot("stray").is_none());
        assert!(dataset
            .snapshots
            .iter()
            .all(|s| s.dataset == mount && s.path.starts_with(mount.join(SNAPSHOT_DIR))));
    }

    #[test]
    fn test_open_missing_control_dir() {
        let dir = tempdir().unwrap();
        assert!(Dataset::open(dir.path().join("nope")).is_err());
    }
}
