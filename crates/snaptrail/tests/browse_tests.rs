//! End-to-end browsing over a fake pool on disk.
//!
//! The pool is a plain directory with a `.zfs/snapshot` tree, which is all
//! the store needs to find datasets and snapshots.

use snaptrail_core::{
    snapshots_containing, Config, DiffState, LocalFs, NavAction, NavigationController,
};
use snaptrail_snapshot::{SnapshotStore, ZfsStore, SNAPSHOT_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Pool {
    _dir: TempDir,
    mount: PathBuf,
}

/// tank/projects/{notes.md, src/main.rs}; snapshot `nightly` holds
/// tank/projects/{notes.md (older), old/readme}.
fn pool() -> Pool {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mount = dir.path().join("tank");
    fs::create_dir_all(mount.join("projects/src")).unwrap();
    fs::write(mount.join("projects/notes.md"), "current notes").unwrap();
    fs::write(mount.join("projects/src/main.rs"), "fn main() {}").unwrap();

    let snap = mount.join(SNAPSHOT_DIR).join("nightly/projects");
    fs::create_dir_all(snap.join("old")).unwrap();
    fs::write(snap.join("notes.md"), "notes").unwrap();
    fs::write(snap.join("old/readme"), "gone now").unwrap();
    Pool { _dir: dir, mount }
}

async fn controller(pool: &Pool) -> NavigationController {
    let content = format!(
        r#"{{ "datasets": [{:?}], "browser": {{ "sort_column": "name" }} }}"#,
        pool.mount.display().to_string()
    );
    let (config, _) = Config::load_from(None, Some(&content), None)
        .await
        .expect("Failed to load config");

    NavigationController::new(
        Arc::new(LocalFs::new().with_hidden(config.should_show_hidden())),
        Arc::new(ZfsStore::new(config.datasets().to_vec())),
    )
    .with_sort(config.sort_column(), config.sort_inverted())
}

fn selected(nav: &NavigationController) -> Option<PathBuf> {
    nav.selection().map(|e| e.id().to_path_buf())
}

fn state(nav: &NavigationController, name: &str) -> Option<DiffState> {
    nav.entries()
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.diff_state)
}

#[tokio::test]
async fn test_compare_and_walk_into_deleted_directory() {
    let pool = pool();
    let mut nav = controller(&pool).await;
    let projects = pool.mount.join("projects");

    nav.set_path(&projects).unwrap();
    assert_eq!(state(&nav, "notes.md"), Some(DiffState::Unknown));

    let nightly = nav
        .reconciler()
        .store()
        .dataset_for(&projects)
        .unwrap()
        .find_snapshot("nightly")
        .cloned()
        .expect("nightly snapshot");
    nav.set_selected_snapshot(Some(nightly)).unwrap();

    assert_eq!(state(&nav, "notes.md"), Some(DiffState::Modified));
    assert_eq!(state(&nav, "src"), Some(DiffState::Added));
    assert_eq!(state(&nav, "old"), Some(DiffState::Deleted));

    // The deleted directory opens from the snapshot side
    nav.table_mut().select(Some(&projects.join("old")));
    nav.handle(NavAction::Right).unwrap();
    assert_eq!(nav.path(), projects.join("old"));
    assert_eq!(state(&nav, "readme"), Some(DiffState::Deleted));

    nav.handle(NavAction::Left).unwrap();
    assert_eq!(nav.path(), projects);
    assert_eq!(selected(&nav), Some(projects.join("old")));
}

#[tokio::test]
async fn test_snapshot_list_follows_tracked_path() {
    let pool = pool();
    let mut nav = controller(&pool).await;
    let projects = pool.mount.join("projects");
    nav.set_path(&projects).unwrap();

    let store: Arc<dyn SnapshotStore> = Arc::new(ZfsStore::new(vec![pool.mount.clone()]));
    let fs = LocalFs::new();
    let snapshots = store.list_snapshots(&projects).unwrap();

    nav.table_mut().select(Some(&projects.join("notes.md")));
    let rows = snapshots_containing(
        store.as_ref(),
        &fs,
        &snapshots,
        Some(nav.tracked_path()),
    );
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains_tracked);

    nav.table_mut().select(Some(&projects.join("src")));
    let rows = snapshots_containing(
        store.as_ref(),
        &fs,
        &snapshots,
        Some(nav.tracked_path()),
    );
    assert!(!rows[0].contains_tracked);
}

#[tokio::test]
async fn test_snapshot_control_directory_is_hidden() {
    let pool = pool();
    let mut nav = controller(&pool).await;
    nav.set_path(&pool.mount).unwrap();

    let names: Vec<&str> = nav.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["projects"]);
    assert!(Path::new(&pool.mount).join(".zfs").is_dir());
}
