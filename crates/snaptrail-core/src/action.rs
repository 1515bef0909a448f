//! Actions the operator can request on browser entries.
//!
//! The browser only collects the operator's choice; carrying it out is up
//! to whoever receives the [`ActionRequest`].

use crate::entry::BrowserEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::oneshot;

/// Identifier of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    /// Copy the snapshot version over the live tree.
    Restore,
    /// Delete the live entry.
    Delete,
    CreateSnapshot,
    DestroySnapshot,
}

impl ActionId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "Restore from snapshot",
            Self::Delete => "Delete live file",
            Self::CreateSnapshot => "Create snapshot",
            Self::DestroySnapshot => "Destroy snapshot",
        }
    }

    /// Actions that make sense for `targets`.
    pub fn available(targets: &[&BrowserEntry], snapshot_selected: bool) -> Vec<ActionId> {
        let mut actions = Vec::new();
        if !targets.is_empty() {
            if targets.iter().all(|e| e.snapshot_file().is_some()) {
                actions.push(Self::Restore);
            }
            if targets.iter().all(|e| e.real.is_some()) {
                actions.push(Self::Delete);
            }
        }
        actions.push(Self::CreateSnapshot);
        if snapshot_selected {
            actions.push(Self::DestroySnapshot);
        }
        actions
    }
}

/// An action chosen for a set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: ActionId,
    pub targets: Vec<PathBuf>,
}

/// Resolves once: with the request, or with an error if the dialog was
/// dismissed.
pub type ActionReceiver = oneshot::Receiver<ActionRequest>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{RealFile, SnapshotFile};
    use crate::fs::{EntryKind, FileStat};
    use chrono::Utc;
    use snaptrail_snapshot::Snapshot;
    use std::sync::Arc;

    fn stat() -> FileStat {
        FileStat {
            kind: EntryKind::File,
            size: 1,
            modified: None,
            mode: 0o644,
        }
    }

    fn live_only() -> BrowserEntry {
        BrowserEntry::new(
            Some(RealFile::new(PathBuf::from("/tank/new"), stat())),
            None,
            true,
        )
        .unwrap()
    }

    fn deleted() -> BrowserEntry {
        let snapshot = Arc::new(Snapshot::new(
            "/tank",
            "s",
            "/tank/.zfs/snapshot/s",
            Utc::now(),
        ));
        BrowserEntry::new(
            None,
            Some(SnapshotFile {
                path: PathBuf::from("/tank/.zfs/snapshot/s/gone"),
                original_path: PathBuf::from("/tank/gone"),
                stat: stat(),
                snapshot,
            }),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_available_actions() {
        let live = live_only();
        let gone = deleted();

        assert_eq!(
            ActionId::available(&[&live], true),
            vec![ActionId::Delete, ActionId::CreateSnapshot, ActionId::DestroySnapshot]
        );
        assert_eq!(
            ActionId::available(&[&gone], true),
            vec![ActionId::Restore, ActionId::CreateSnapshot, ActionId::DestroySnapshot]
        );
        assert_eq!(
            ActionId::available(&[&live, &gone], false),
            vec![ActionId::CreateSnapshot]
        );
    }
}
