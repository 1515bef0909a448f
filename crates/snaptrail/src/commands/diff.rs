//! `diff`: a directory compared against one snapshot, printed once.

use super::Settings;
use anyhow::Context;
use bytesize::ByteSize;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use snaptrail_core::{
    BrowserColumn, BrowserEntry, BrowserTable, DiffState, EntryKind, Reconciler, StableTable,
};
use snaptrail_snapshot::SnapshotError;
use snaptrail_util::path::{parent_or_self, resolve_start};
use std::path::{Path, PathBuf};

/// One line of diff output.
#[derive(Debug, Clone, Serialize)]
pub struct DiffRow {
    pub name: String,
    pub path: PathBuf,
    pub state: DiffState,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub mode: String,
}

impl From<&BrowserEntry> for DiffRow {
    fn from(entry: &BrowserEntry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.id().to_path_buf(),
            state: entry.diff_state,
            kind: entry.kind,
            size: entry.size(),
            modified: entry.modified(),
            mode: entry.stat().mode_string(),
        }
    }
}

/// Print `path` compared against the snapshot called `snapshot`.
pub fn print_diff(
    settings: &Settings,
    path: &Path,
    cwd: &Path,
    snapshot: &str,
    changed_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    let start = resolve_start(path, cwd)?;
    let dir = if start.is_dir() {
        start
    } else {
        parent_or_self(&start)
    };

    let reconciler = Reconciler::new(settings.fs(), settings.store());
    let config = &settings.config;
    let rows = diff_rows(
        &reconciler,
        &dir,
        snapshot,
        config.sort_column(),
        config.sort_inverted(),
    )
    .with_context(|| format!("cannot compare {} against {snapshot}", dir.display()))?;

    let rows: Vec<DiffRow> = rows
        .into_iter()
        .filter(|row| !changed_only || row.state != DiffState::Equal)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} @ {snapshot}", dir.display());
        print!("{}", format_diff(&rows));
    }
    Ok(())
}

/// Reconcile `dir` against the named snapshot and sort the result the way
/// the browser would.
pub fn diff_rows(
    reconciler: &Reconciler,
    dir: &Path,
    snapshot: &str,
    sort: BrowserColumn,
    inverted: bool,
) -> anyhow::Result<Vec<DiffRow>> {
    let dataset = reconciler.store().dataset_for(dir)?;
    let snapshot = dataset
        .find_snapshot(snapshot)
        .cloned()
        .ok_or_else(|| SnapshotError::not_found(snapshot))?;

    let entries = reconciler.reconcile(dir, Some(&snapshot))?;
    let mut table: BrowserTable = StableTable::new(BrowserColumn::compare);
    table.set_columns(BrowserColumn::ALL.to_vec(), Some(sort), inverted);
    table.set_data(entries);

    Ok(table.entries().iter().map(DiffRow::from).collect())
}

/// Aligned text listing with a per-state summary at the end.
pub fn format_diff(rows: &[DiffRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let size = if row.kind == EntryKind::Directory {
            "-".to_string()
        } else {
            ByteSize(row.size).to_string()
        };
        let modified = row
            .modified
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let suffix = match row.kind {
            EntryKind::Directory => "/",
            EntryKind::Link => "@",
            EntryKind::File => "",
        };
        out.push_str(&format!(
            "{} {:<8}  {}  {:>10}  {:<16}  {}{}\n",
            row.state.symbol(),
            row.state.label(),
            row.mode,
            size,
            modified,
            row.name,
            suffix
        ));
    }

    let count = |state: DiffState| rows.iter().filter(|r| r.state == state).count();
    out.push_str(&format!(
        "{} added, {} deleted, {} modified, {} equal\n",
        count(DiffState::Added),
        count(DiffState::Deleted),
        count(DiffState::Modified),
        count(DiffState::Equal)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaptrail_core::LocalFs;
    use snaptrail_snapshot::{ZfsStore, SNAPSHOT_DIR};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn pool() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let mount = dir.path().join("tank");
        fs::create_dir_all(mount.join("a/sub")).unwrap();
        fs::write(mount.join("a/foo.txt"), "changed content").unwrap();
        fs::write(mount.join("a/z.txt"), "new").unwrap();

        let snap = mount.join(SNAPSHOT_DIR).join("monday/a");
        fs::create_dir_all(&snap).unwrap();
        fs::write(snap.join("foo.txt"), "old").unwrap();
        fs::write(snap.join("gone.txt"), "bye").unwrap();
        (dir, mount)
    }

    fn reconciler(mount: &Path) -> Reconciler {
        Reconciler::new(
            Arc::new(LocalFs::new()),
            Arc::new(ZfsStore::new(vec![mount.to_path_buf()])),
        )
    }

    fn state_of(rows: &[DiffRow], name: &str) -> Option<DiffState> {
        rows.iter().find(|r| r.name == name).map(|r| r.state)
    }

    #[test]
    fn test_diff_rows_classify_entries() {
        let (_dir, mount) = pool();
        let rows = diff_rows(
            &reconciler(&mount),
            &mount.join("a"),
            "monday",
            BrowserColumn::Name,
            false,
        )
        .unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(state_of(&rows, "foo.txt"), Some(DiffState::Modified));
        assert_eq!(state_of(&rows, "gone.txt"), Some(DiffState::Deleted));
        assert_eq!(state_of(&rows, "z.txt"), Some(DiffState::Added));
        assert_eq!(state_of(&rows, "sub"), Some(DiffState::Added));
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo.txt", "gone.txt", "sub", "z.txt"]);
        assert_eq!(rows[2].kind, EntryKind::Directory);
    }

    #[test]
    fn test_diff_rows_unknown_snapshot() {
        let (_dir, mount) = pool();
        let err = diff_rows(
            &reconciler(&mount),
            &mount.join("a"),
            "friday",
            BrowserColumn::Name,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("friday"));
    }

    #[test]
    fn test_format_diff_summary() {
        let (_dir, mount) = pool();
        let rows = diff_rows(
            &reconciler(&mount),
            &mount.join("a"),
            "monday",
            BrowserColumn::Name,
            false,
        )
        .unwrap();

        let text = format_diff(&rows);
        assert!(text.lines().any(|l| l.starts_with("~ modified") && l.ends_with("foo.txt")));
        assert!(text.lines().any(|l| l.starts_with("- deleted") && l.ends_with("gone.txt")));
        assert!(text.lines().any(|l| l.ends_with("sub/")));
        assert_eq!(
            text.lines().last(),
            Some("2 added, 1 deleted, 1 modified, 0 equal")
        );
    }
}
