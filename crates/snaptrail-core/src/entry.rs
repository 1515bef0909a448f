//! Browser rows: live files, snapshot files and their pairing.

use crate::fs::{file_name, EntryKind, FileStat, LiveFs};
use crate::table::TableEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snaptrail_snapshot::{Snapshot, SnapshotId, SnapshotStore};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An entry of the live tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RealFile {
    pub name: String,
    /// Absolute live path.
    pub path: PathBuf,
    pub stat: FileStat,
}

impl RealFile {
    pub fn new(path: PathBuf, stat: FileStat) -> Self {
        Self {
            name: file_name(&path),
            path,
            stat,
        }
    }
}

/// An entry inside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFile {
    /// Path inside the snapshot directory.
    pub path: PathBuf,
    /// Where the entry lives (or lived) in the live tree.
    pub original_path: PathBuf,
    pub stat: FileStat,
    pub snapshot: Arc<Snapshot>,
}

impl SnapshotFile {
    pub fn name(&self) -> String {
        file_name(&self.original_path)
    }
}

/// How an entry differs between the live tree and the selected snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffState {
    /// Only in the live tree.
    Added,
    /// Only in the snapshot.
    Deleted,
    Modified,
    Equal,
    /// No snapshot selected.
    Unknown,
}

impl DiffState {
    /// Classify a pairing.
    pub fn classify(
        real: Option<&RealFile>,
        snapshot: Option<&SnapshotFile>,
        snapshot_selected: bool,
    ) -> Self {
        if !snapshot_selected {
            return Self::Unknown;
        }
        match (real, snapshot) {
            (Some(real), Some(snap)) => {
                let differs = real.stat.kind != snap.stat.kind
                    || real.stat.mode != snap.stat.mode
                    || real.stat.modified != snap.stat.modified
                    || real.stat.size != snap.stat.size
                    || real.name != snap.name();
                if differs {
                    Self::Modified
                } else {
                    Self::Equal
                }
            }
            (Some(_), None) => Self::Added,
            (None, Some(_)) => Self::Deleted,
            (None, None) => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::Equal => "equal",
            Self::Unknown => "unknown",
        }
    }

    /// One-character marker for compact listings.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Added => "+",
            Self::Deleted => "-",
            Self::Modified => "~",
            Self::Equal => "=",
            Self::Unknown => " ",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Added => 0,
            Self::Deleted => 1,
            Self::Modified => 2,
            Self::Equal => 3,
            Self::Unknown => 4,
        }
    }
}

/// One row of the file browser: a live file, a snapshot file, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserEntry {
    id: PathBuf,
    pub name: String,
    pub real: Option<RealFile>,
    pub snapshots: Vec<SnapshotFile>,
    pub kind: EntryKind,
    pub diff_state: DiffState,
    /// Stat of the side shown in the listing.
    shown: FileStat,
}

impl BrowserEntry {
    /// Pair a live file with its snapshot counterpart.
    ///
    /// Returns `None` when both sides are missing.
    pub fn new(
        real: Option<RealFile>,
        snapshot: Option<SnapshotFile>,
        snapshot_selected: bool,
    ) -> Option<Self> {
        let diff_state = DiffState::classify(real.as_ref(), snapshot.as_ref(), snapshot_selected);
        let (id, name, shown) = match (&real, &snapshot) {
            (Some(r), _) => (r.path.clone(), r.name.clone(), r.stat.clone()),
            (None, Some(s)) => (s.original_path.clone(), s.name(), s.stat.clone()),
            (None, None) => return None,
        };
        Some(Self {
            id,
            name,
            real,
            snapshots: snapshot.into_iter().collect(),
            kind: shown.kind,
            diff_state,
            shown,
        })
    }

    /// Stable id: the live path, or the live-equivalent path of a
    /// snapshot-only entry.
    pub fn id(&self) -> &Path {
        &self.id
    }

    pub fn snapshot_file(&self) -> Option<&SnapshotFile> {
        self.snapshots.first()
    }

    /// Stat of the live side, else of the snapshot side.
    pub fn stat(&self) -> &FileStat {
        &self.shown
    }

    pub fn size(&self) -> u64 {
        self.stat().size
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.stat().modified
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether the entry can be entered, following links on the live side.
    pub fn is_navigable(&self, fs: &dyn LiveFs) -> bool {
        match self.kind {
            EntryKind::Directory => true,
            EntryKind::Link => self.real.is_some() && fs.is_dir(&self.id),
            EntryKind::File => false,
        }
    }
}

impl TableEntry for BrowserEntry {
    type Id = PathBuf;

    fn id(&self) -> &PathBuf {
        &self.id
    }

    fn kind_rank(&self) -> u8 {
        self.kind.rank()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// File browser columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserColumn {
    Name,
    Diff,
    Size,
    Modified,
    Mode,
}

impl BrowserColumn {
    pub const ALL: [BrowserColumn; 5] = [
        BrowserColumn::Name,
        BrowserColumn::Diff,
        BrowserColumn::Size,
        BrowserColumn::Modified,
        BrowserColumn::Mode,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Diff => "Diff",
            Self::Size => "Size",
            Self::Modified => "Modified",
            Self::Mode => "Mode",
        }
    }

    pub fn compare(self, a: &BrowserEntry, b: &BrowserEntry) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Diff => a.diff_state.rank().cmp(&b.diff_state.rank()),
            Self::Size => a.size().cmp(&b.size()),
            Self::Modified => a.modified().cmp(&b.modified()),
            Self::Mode => a.stat().mode.cmp(&b.stat().mode),
        }
    }
}

/// One row of the snapshot list.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotBrowserEntry {
    pub snapshot: Arc<Snapshot>,
    /// Whether the tracked path exists inside this snapshot.
    pub contains_tracked: bool,
}

impl TableEntry for SnapshotBrowserEntry {
    type Id = SnapshotId;

    fn id(&self) -> &SnapshotId {
        &self.snapshot.id
    }

    fn kind_rank(&self) -> u8 {
        0
    }

    fn sort_name(&self) -> &str {
        &self.snapshot.name
    }
}

/// Snapshot list columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotColumn {
    Name,
    Created,
    Contains,
}

impl SnapshotColumn {
    pub const ALL: [SnapshotColumn; 3] = [
        SnapshotColumn::Name,
        SnapshotColumn::Created,
        SnapshotColumn::Contains,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Snapshot",
            Self::Created => "Created",
            Self::Contains => "Has",
        }
    }

    pub fn compare(self, a: &SnapshotBrowserEntry, b: &SnapshotBrowserEntry) -> Ordering {
        match self {
            Self::Name => a.snapshot.name.cmp(&b.snapshot.name),
            Self::Created => a.snapshot.created.cmp(&b.snapshot.created),
            Self::Contains => a.contains_tracked.cmp(&b.contains_tracked),
        }
    }
}

/// Build the snapshot list rows for `tracked`.
///
/// A snapshot contains the tracked path when the mapped path exists in it
/// (links included). With no tracked path nothing is marked.
pub fn snapshots_containing(
    store: &dyn SnapshotStore,
    fs: &dyn LiveFs,
    snapshots: &[Arc<Snapshot>],
    tracked: Option<&Path>,
) -> Vec<SnapshotBrowserEntry> {
    snapshots
        .iter()
        .map(|snapshot| {
            let contains_tracked = tracked.is_some_and(|path| {
                store
                    .map_to_snapshot_path(path, snapshot)
                    .map(|mapped| fs.stat_entry(&mapped).is_ok())
                    .unwrap_or(false)
            });
            SnapshotBrowserEntry {
                snapshot: Arc::clone(snapshot),
                contains_tracked,
            }
        })
        .collect()
}
