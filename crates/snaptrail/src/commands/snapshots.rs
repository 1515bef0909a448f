//! `list-snapshots`: the snapshots covering a path.

use super::Settings;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use snaptrail_core::{snapshots_containing, LiveFs};
use snaptrail_snapshot::SnapshotStore;
use snaptrail_util::path::resolve_start;
use std::path::{Path, PathBuf};

/// Snapshots of one dataset, checked against a tracked path.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub dataset: PathBuf,
    pub tracked: PathBuf,
    pub snapshots: Vec<SnapshotRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRow {
    pub name: String,
    pub created: DateTime<Utc>,
    pub path: PathBuf,
    /// Whether the tracked path exists in this snapshot.
    pub contains: bool,
}

/// Print the snapshots covering `path`.
pub fn print_snapshots(
    settings: &Settings,
    path: &Path,
    cwd: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let tracked = resolve_start(path, cwd)?;
    let report = snapshot_report(settings.store().as_ref(), settings.fs().as_ref(), &tracked)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_snapshots(&report));
    }
    Ok(())
}

/// Collect the snapshots of the dataset containing `tracked`, newest first.
pub fn snapshot_report(
    store: &dyn SnapshotStore,
    fs: &dyn LiveFs,
    tracked: &Path,
) -> anyhow::Result<SnapshotReport> {
    let dataset = store.dataset_for(tracked)?;
    let snapshots = snapshots_containing(store, fs, &dataset.snapshots, Some(tracked))
        .into_iter()
        .map(|row| SnapshotRow {
            name: row.snapshot.name.clone(),
            created: row.snapshot.created,
            path: row.snapshot.path.clone(),
            contains: row.contains_tracked,
        })
        .collect();

    Ok(SnapshotReport {
        dataset: dataset.mountpoint,
        tracked: tracked.to_path_buf(),
        snapshots,
    })
}

/// Plain text table of a report.
pub fn format_snapshots(report: &SnapshotReport) -> String {
    let mut out = format!(
        "{} ({} snapshots)\n",
        report.dataset.display(),
        report.snapshots.len()
    );
    if report.snapshots.is_empty() {
        return out;
    }

    let width = report
        .snapshots
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("SNAPSHOT".len());

    out.push_str(&format!("{:<width$}  {:<16}  HAS\n", "SNAPSHOT", "CREATED"));
    for row in &report.snapshots {
        let created = row
            .created
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let has = if row.contains { "yes" } else { "no" };
        out.push_str(&format!("{:<width$}  {created:<16}  {has}\n", row.name));
    }
    out
}
