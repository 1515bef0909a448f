//! Merging a live listing with a snapshot listing.

use crate::entry::{BrowserEntry, RealFile, SnapshotFile};
use crate::error::{BrowseError, BrowseResult};
use crate::fs::LiveFs;
use snaptrail_snapshot::{Snapshot, SnapshotStore};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds browser rows for one directory.
#[derive(Clone)]
pub struct Reconciler {
    fs: Arc<dyn LiveFs>,
    store: Arc<dyn SnapshotStore>,
}

impl Reconciler {
    pub fn new(fs: Arc<dyn LiveFs>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { fs, store }
    }

    pub fn fs(&self) -> &Arc<dyn LiveFs> {
        &self.fs
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// List `dir`, pairing live entries with their counterparts in
    /// `snapshot`.
    ///
    /// Live entries come first in listing order, followed by entries that
    /// only exist in the snapshot. A missing live directory lists as empty;
    /// a denied one fails the whole pass.
    pub fn reconcile(
        &self,
        dir: &Path,
        snapshot: Option<&Arc<Snapshot>>,
    ) -> BrowseResult<Vec<BrowserEntry>> {
        let live_paths = match self.fs.list_entries(dir) {
            Ok(paths) => paths,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %dir.display(), "Live directory missing, listing as empty");
                Vec::new()
            }
            Err(e) => return Err(BrowseError::from_io(dir, e)),
        };

        let mut snapshot_only: Vec<Option<SnapshotFile>> = match snapshot {
            Some(snapshot) => self
                .snapshot_files(dir, snapshot)
                .into_iter()
                .map(Some)
                .collect(),
            None => Vec::new(),
        };
        let by_live_path: HashMap<PathBuf, usize> = snapshot_only
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (f.original_path.clone(), i)))
            .collect();

        let snapshot_selected = snapshot.is_some();
        let mut entries = Vec::with_capacity(live_paths.len() + snapshot_only.len());

        for path in live_paths {
            if self.store.is_internal(&path) {
                continue;
            }
            let paired = by_live_path
                .get(&path)
                .and_then(|&i| snapshot_only[i].take());
            // The whole row goes, so the snapshot side does not show as deleted
            let stat = match self.fs.stat_entry(&path) {
                Ok(stat) => stat,
                Err(source) => {
                    let err = BrowseError::StatFailure { path, source };
                    warn!(error = %err, "Skipping entry");
                    continue;
                }
            };
            let real = RealFile::new(path, stat);
            entries.extend(BrowserEntry::new(Some(real), paired, snapshot_selected));
        }

        entries.extend(
            snapshot_only
                .into_iter()
                .flatten()
                .filter_map(|file| BrowserEntry::new(None, Some(file), true)),
        );

        debug!(
            path = %dir.display(),
            snapshot = snapshot.map(|s| s.name.as_str()).unwrap_or("-"),
            count = entries.len(),
            "Reconciled directory"
        );

        Ok(entries)
    }

    /// Entries of the snapshot directory mapped from `dir`.
    ///
    /// Any failure here yields an empty list; the live side still shows.
    fn snapshot_files(&self, dir: &Path, snapshot: &Arc<Snapshot>) -> Vec<SnapshotFile> {
        let mapped = match self.store.map_to_snapshot_path(dir, snapshot) {
            Ok(mapped) => mapped,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Cannot map directory into snapshot");
                return Vec::new();
            }
        };

        let paths = match self.fs.list_entries(&mapped) {
            Ok(paths) => paths,
            Err(e) => {
                debug!(path = %mapped.display(), error = %e, "Snapshot directory not listable");
                return Vec::new();
            }
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let stat = match self.fs.stat_entry(&path) {
                Ok(stat) => stat,
                Err(source) => {
                    let err = BrowseError::StatFailure { path, source };
                    warn!(error = %err, "Skipping snapshot entry");
                    continue;
                }
            };
            let original_path = match self.store.map_to_live_path(&path, snapshot) {
                Ok(p) => p,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot map snapshot entry");
                    continue;
                }
            };
            if self.store.is_internal(&original_path) {
                continue;
            }
            files.push(SnapshotFile {
                path,
                original_path,
                stat,
                snapshot: Arc::clone(snapshot),
            });
        }
        files
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}
