//! Directory navigation over a reconciled table.
//!
//! [`NavigationController`] owns the current path, the selected snapshot,
//! the browser table and the per-directory cursor memory. Every path or
//! snapshot change runs one reconcile pass and then records and restores
//! the cursor around the data replacement:
//!
//! ```text
//! set_path / enter / go_up / set_selected_snapshot / refresh
//!        │
//!        ▼
//!   Reconciler::reconcile ──error──▶ state unchanged, error returned
//!        │
//!        ▼
//!   SelectionMemory::record(old path)
//!   StableTable::set_data(entries)
//!   SelectionMemory::restore(new path) ──▶ StableTable::select
//!        │
//!        ▼
//!   path / selection callbacks
//! ```

use crate::entry::{BrowserColumn, BrowserEntry};
use crate::error::{BrowseError, BrowseResult};
use crate::fs::{EntryKind, LiveFs};
use crate::memory::SelectionMemory;
use crate::reconcile::Reconciler;
use crate::table::StableTable;
use snaptrail_snapshot::{Snapshot, SnapshotStore};
use snaptrail_util::path::{normalize, parent_or_self};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Called with the entry under the cursor (`None` for the header).
pub type SelectionCallback = Box<dyn FnMut(Option<&BrowserEntry>) + Send>;

/// Called with the new current directory.
pub type PathCallback = Box<dyn FnMut(&Path) + Send>;

/// The browser table type.
pub type BrowserTable = StableTable<BrowserEntry, BrowserColumn>;

/// A navigation request coming from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    /// Go to the parent, or the previous sort column on the header.
    Left,
    /// Enter the entry, or the next sort column on the header.
    Right,
    /// Enter the entry, or flip the sort direction on the header.
    Confirm,
    PageUp(usize),
    PageDown(usize),
    First,
    Last,
    ToggleMark,
    ClearMarks,
}

/// How to place the cursor after loading a directory.
enum Focus {
    /// Use the selection memory.
    Memory,
    /// Select this entry.
    Entry(PathBuf),
    /// Coming up from this child directory.
    UpFrom(PathBuf),
}

/// Owns the browsing state for one pane.
pub struct NavigationController {
    reconciler: Reconciler,
    table: BrowserTable,
    memory: SelectionMemory<PathBuf>,
    path: PathBuf,
    snapshot: Option<Arc<Snapshot>>,
    last_selected: Option<PathBuf>,
    selection_callbacks: Vec<SelectionCallback>,
    path_callbacks: Vec<PathCallback>,
}

impl NavigationController {
    /// Create a controller with no current directory.
    ///
    /// Call [`set_path`](Self::set_path) to load the first directory.
    pub fn new(fs: Arc<dyn LiveFs>, store: Arc<dyn SnapshotStore>) -> Self {
        let mut table = StableTable::new(BrowserColumn::compare);
        table.set_columns(BrowserColumn::ALL.to_vec(), Some(BrowserColumn::Name), false);

        Self {
            reconciler: Reconciler::new(fs, store),
            table,
            memory: SelectionMemory::new(),
            path: PathBuf::new(),
            snapshot: None,
            last_selected: None,
            selection_callbacks: Vec::new(),
            path_callbacks: Vec::new(),
        }
    }

    /// Set the initial sort column and direction.
    pub fn with_sort(mut self, column: BrowserColumn, inverted: bool) -> Self {
        self.table
            .set_columns(BrowserColumn::ALL.to_vec(), Some(column), inverted);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn selected_snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    /// The entry under the cursor; `None` while the header is focused.
    pub fn selection(&self) -> Option<&BrowserEntry> {
        self.table.selected()
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        self.table.entries()
    }

    pub fn table(&self) -> &BrowserTable {
        &self.table
    }

    /// Direct table access. Cursor moves made here do not fire callbacks.
    pub fn table_mut(&mut self) -> &mut BrowserTable {
        &mut self.table
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// The path the snapshot list should track: the entry under the
    /// cursor, or the current directory on the header.
    pub fn tracked_path(&self) -> &Path {
        self.selection()
            .map(|e| e.id())
            .unwrap_or(self.path.as_path())
    }

    pub fn on_selection_changed(
        &mut self,
        callback: impl FnMut(Option<&BrowserEntry>) + Send + 'static,
    ) {
        self.selection_callbacks.push(Box::new(callback));
    }

    pub fn on_path_changed(&mut self, callback: impl FnMut(&Path) + Send + 'static) {
        self.path_callbacks.push(Box::new(callback));
    }

    /// Navigate to `path`.
    ///
    /// A file target opens its parent with the file selected. A directory
    /// that only exists in the selected snapshot can be opened too. Relative
    /// paths are rejected. On error the current path is left unchanged.
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> BrowseResult<()> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(BrowseError::InvalidTarget {
                path: path.to_path_buf(),
            });
        }
        let path = normalize(path);
        match self.resolve_target(&path)? {
            Target::Directory => self.load(path, Focus::Memory),
            Target::File => {
                let err = BrowseError::InvalidTarget { path: path.clone() };
                debug!(error = %err, "Opening parent instead");
                self.load(parent_or_self(&path), Focus::Entry(path))
            }
        }
    }

    /// Enter the directory under the cursor.
    ///
    /// With the header focused or an empty listing this goes up instead.
    /// Returns `false` when the entry is not a directory.
    pub fn enter(&mut self) -> BrowseResult<bool> {
        let fs = self.reconciler.fs();
        let target = self
            .table
            .selected()
            .map(|entry| (entry.id().to_path_buf(), entry.is_navigable(fs.as_ref())));

        match target {
            None => self.go_up(),
            Some((path, true)) => {
                self.load(path, Focus::Memory)?;
                Ok(true)
            }
            Some((_, false)) => Ok(false),
        }
    }

    /// Go to the parent directory.
    ///
    /// The cursor returns to the entry remembered for the parent when it is
    /// still listed, and lands on the directory just left otherwise.
    /// Returns `false` at the filesystem root.
    pub fn go_up(&mut self) -> BrowseResult<bool> {
        let parent = parent_or_self(&self.path);
        if parent == self.path {
            return Ok(false);
        }
        let child = self.path.clone();
        self.load(parent, Focus::UpFrom(child))?;
        Ok(true)
    }

    /// Switch the snapshot the listing is compared against.
    pub fn set_selected_snapshot(&mut self, snapshot: Option<Arc<Snapshot>>) -> BrowseResult<()> {
        let previous = std::mem::replace(&mut self.snapshot, snapshot);
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let path = self.path.clone();
        if let Err(e) = self.load(path, Focus::Memory) {
            self.snapshot = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Reload the current directory.
    pub fn refresh(&mut self) -> BrowseResult<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let path = self.path.clone();
        self.load(path, Focus::Memory)
    }

    /// Apply a keyboard navigation request.
    pub fn handle(&mut self, action: NavAction) -> BrowseResult<()> {
        let on_header = self.table.is_header_selected() && !self.table.is_empty();
        match action {
            NavAction::Up => self.table.move_up(),
            NavAction::Down => self.table.move_down(),
            NavAction::PageUp(rows) => self.table.page_up(rows),
            NavAction::PageDown(rows) => self.table.page_down(rows),
            NavAction::First => self.table.move_to_first(),
            NavAction::Last => self.table.move_to_last(),
            NavAction::Left if on_header => {
                self.table.cycle_sort_column(false);
            }
            NavAction::Right if on_header => {
                self.table.cycle_sort_column(true);
            }
            NavAction::Confirm if on_header => {
                self.table.toggle_sort_direction();
            }
            NavAction::Left => {
                self.go_up()?;
            }
            // Only Left and Confirm leave an empty listing
            NavAction::Right if self.table.selected().is_none() => {}
            NavAction::Right | NavAction::Confirm => {
                self.enter()?;
            }
            NavAction::ToggleMark => {
                if let Some(id) = self.table.selected_id().cloned() {
                    self.table.toggle_multi_select(&id);
                    self.table.move_down();
                }
            }
            NavAction::ClearMarks => self.table.clear_multi_selection(),
        }
        self.notify_selection();
        Ok(())
    }

    /// Marked entries, or the entry under the cursor when nothing is
    /// marked.
    pub fn action_targets(&self) -> Vec<&BrowserEntry> {
        let marked = self.table.multi_selection();
        if !marked.is_empty() {
            return marked;
        }
        self.table.selected().into_iter().collect()
    }

    fn resolve_target(&self, path: &Path) -> BrowseResult<Target> {
        let fs = self.reconciler.fs();
        match fs.stat_entry(path) {
            Ok(stat) if stat.kind == EntryKind::Directory => Ok(Target::Directory),
            Ok(stat) if stat.kind == EntryKind::Link && fs.is_dir(path) => Ok(Target::Directory),
            Ok(_) => Ok(Target::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if self.exists_in_snapshot(path) {
                    Ok(Target::Directory)
                } else {
                    Err(BrowseError::NotFound {
                        path: path.to_path_buf(),
                    })
                }
            }
            Err(e) => Err(BrowseError::from_io(path, e)),
        }
    }

    fn exists_in_snapshot(&self, path: &Path) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        self.reconciler
            .store()
            .map_to_snapshot_path(path, snapshot)
            .map(|mapped| self.reconciler.fs().is_dir(&mapped))
            .unwrap_or(false)
    }

    fn load(&mut self, dir: PathBuf, focus: Focus) -> BrowseResult<()> {
        let entries = self.reconciler.reconcile(&dir, self.snapshot.as_ref())?;

        if !self.path.as_os_str().is_empty() {
            let id = self.table.selected_id().cloned();
            let index = self.table.cursor().unwrap_or(0);
            self.memory.record(&self.path, id, index);
        }

        let path_changed = dir != self.path;
        self.path = dir;
        self.table.set_data(entries);

        let target = match focus {
            Focus::Memory => self.memory.restore(&self.path, self.table.entries()),
            Focus::Entry(id) => Some(id),
            Focus::UpFrom(child) => match self.memory.remembered_id(&self.path) {
                Some(id) if self.table.position(id).is_some() => Some(id.clone()),
                _ => Some(child),
            },
        };
        self.table.select(target.as_ref());

        debug!(
            path = %self.path.display(),
            entries = self.table.len(),
            selected = ?self.table.selected_id(),
            "Loaded directory"
        );

        if path_changed {
            for callback in &mut self.path_callbacks {
                callback(&self.path);
            }
        }
        self.notify_selection();
        Ok(())
    }

    fn notify_selection(&mut self) {
        let current = self.table.selected_id().cloned();
        if current == self.last_selected {
            return;
        }
        self.last_selected = current;
        let selected = self.table.selected();
        for callback in &mut self.selection_callbacks {
            callback(selected);
        }
    }
}

enum Target {
    Directory,
    File,
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("path", &self.path)
            .field("snapshot", &self.snapshot.as_ref().map(|s| &s.name))
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
