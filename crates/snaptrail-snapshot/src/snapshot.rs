//! Snapshot data structures.

use crate::{SnapshotError, SnapshotResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unique identifier for a snapshot, `<mountpoint>@<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    /// Build the id of snapshot `name` on the dataset mounted at `mountpoint`.
    pub fn new(mountpoint: &Path, name: &str) -> Self {
        Self(format!("{}@{}", mountpoint.display(), name))
    }

    /// Get the ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A read-only, point-in-time view of a dataset.
///
/// The snapshot does not own its dataset; `dataset` is the mountpoint that
/// identifies it, so a `Dataset` can own a list of snapshots without a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unique identifier for this snapshot.
    pub id: SnapshotId,

    /// Snapshot name (the part after `@`).
    pub name: String,

    /// Root of the snapshot's file tree (`<mountpoint>/.zfs/snapshot/<name>`).
    pub path: PathBuf,

    /// Mountpoint of the owning dataset.
    pub dataset: PathBuf,

    /// When the snapshot was taken.
    pub created: DateTime<Utc>,
}

impl Snapshot {
    /// Create a new snapshot description.
    pub fn new(
        dataset: impl Into<PathBuf>,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        created: DateTime<Utc>,
    ) -> Self {
        let dataset = dataset.into();
        let name = name.into();
        Self {
            id: SnapshotId::new(&dataset, &name),
            name,
            path: path.into(),
            dataset,
            created,
        }
    }

    /// Map a live path into this snapshot.
    pub fn to_snapshot_path(&self, live: &Path) -> SnapshotResult<PathBuf> {
        let relative = live
            .strip_prefix(&self.dataset)
            .map_err(|_| SnapshotError::outside(live, &self.dataset))?;
        Ok(self.path.join(relative))
    }

    /// Map a path inside this snapshot back to the live tree.
    pub fn to_live_path(&self, snapshot_path: &Path) -> SnapshotResult<PathBuf> {
        let relative = snapshot_path
            .strip_prefix(&self.path)
            .map_err(|_| SnapshotError::outside(snapshot_path, &self.path))?;
        Ok(self.dataset.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(
            "/tank/home",
            "daily-1",
            "/tank/home/.zfs/snapshot/daily-1",
            Utc::now(),
        )
    }

    #[test]
    fn test_id_format() {
        let snap = snapshot();
        assert_eq!(snap.id.as_str(), "/tank/home@daily-1");
        assert_eq!(snap.id.to_string(), "/tank/home@daily-1");
    }

    #[test]
    fn test_to_snapshot_path() {
        let snap = snapshot();
        let mapped = snap
            .to_snapshot_path(Path::new("/tank/home/docs/a.txt"))
            .unwrap();
        assert_eq!(
            mapped,
            PathBuf::from("/tank/home/.zfs/snapshot/daily-1/docs/a.txt")
        );
    }

    #[test]
    fn test_to_snapshot_path_dataset_root() {
        let snap = snapshot();
        let mapped = snap.to_snapshot_path(Path::new("/tank/home")).unwrap();
        assert_eq!(mapped, snap.path);
    }

    #[test]
    fn test_to_live_path_roundtrips() {
        let snap = snapshot();
        let live = Path::new("/tank/home/docs/a.txt");
        let mapped = snap.to_snapshot_path(live).unwrap();
        assert_eq!(snap.to_live_path(&mapped).unwrap(), live);
    }

    #[test]
    fn test_outside_dataset() {
        let snap = snapshot();
        let err = snap.to_snapshot_path(Path::new("/etc/passwd")).unwrap_err();
        assert!(matches!(err, SnapshotError::OutsideDataset { .. }));
    }

    #[test]
    fn test_serialize() {
        let snap = snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("daily-1"));
    }
}
