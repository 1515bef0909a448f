//! Sortable table with a stable cursor and multi-selection.
//!
//! Rows are identified by [`TableEntry::Id`], never by position, so the
//! cursor and the marked rows follow their entries through re-sorts and
//! data refreshes. The cursor can also rest on the header row
//! (`cursor() == None`), which is where sort columns are cycled.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A row that can live in a [`StableTable`].
pub trait TableEntry {
    /// Stable identity of the row across refreshes.
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;

    /// Tie-break rank; higher ranks sort first.
    fn kind_rank(&self) -> u8;

    /// Name used for the final tie-break.
    fn sort_name(&self) -> &str;
}

/// Column comparator supplied by the owner of the table.
pub type Comparator<T, C> = Box<dyn Fn(C, &T, &T) -> Ordering + Send>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_inverted(self) -> bool {
        self == Self::Descending
    }

    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Table state: entries, columns, sort, cursor and marked rows.
pub struct StableTable<T: TableEntry, C> {
    columns: Vec<C>,
    sort_column: Option<C>,
    direction: SortDirection,
    compare: Comparator<T, C>,
    entries: Vec<T>,
    /// `None` is the header row.
    cursor: Option<usize>,
    marked: HashSet<T::Id>,
}

impl<T, C> StableTable<T, C>
where
    T: TableEntry,
    C: Copy + Eq + Debug,
{
    /// Create an empty table sorting through `compare`.
    pub fn new(compare: impl Fn(C, &T, &T) -> Ordering + Send + 'static) -> Self {
        Self {
            columns: Vec::new(),
            sort_column: None,
            direction: SortDirection::Ascending,
            compare: Box::new(compare),
            entries: Vec::new(),
            cursor: None,
            marked: HashSet::new(),
        }
    }

    /// Declare the columns and the initial sort.
    ///
    /// A default sort column that is not among `columns` is ignored.
    pub fn set_columns(&mut self, columns: Vec<C>, default_sort: Option<C>, inverted: bool) {
        self.sort_column = default_sort.filter(|c| columns.contains(c));
        self.columns = columns;
        self.direction = SortDirection::from_inverted(inverted);
        self.resort();
    }

    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    pub fn sort_column(&self) -> Option<C> {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.direction
    }

    /// Replace the rows.
    ///
    /// The current sort is re-applied and marks on ids that disappeared are
    /// dropped. A cursor on the header stays there; a cursor on a row
    /// follows its id, or keeps its index (clamped) when the id is gone.
    pub fn set_data(&mut self, entries: Vec<T>) {
        let previous = self
            .cursor
            .and_then(|i| self.entries.get(i).map(|e| (i, e.id().clone())));

        self.entries = entries;
        self.sort_entries();

        let present: HashSet<&T::Id> = self.entries.iter().map(|e| e.id()).collect();
        self.marked.retain(|id| present.contains(id));

        self.cursor = match previous {
            None => None,
            Some((index, id)) => self
                .position(&id)
                .or_else(|| self.clamp_index(index)),
        };
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry with `id` in display order.
    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Move the cursor to the entry with `id`, or to the header when `id`
    /// is `None` or unknown. Returns whether a row was selected.
    pub fn select(&mut self, id: Option<&T::Id>) -> bool {
        self.cursor = id.and_then(|id| self.position(id));
        self.cursor.is_some()
    }

    /// Move the cursor to a row index (clamped), or to the header.
    pub fn select_index(&mut self, index: Option<usize>) {
        self.cursor = index.and_then(|i| self.clamp_index(i));
    }

    /// The entry under the cursor; `None` while the header is focused.
    pub fn selected(&self) -> Option<&T> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    pub fn selected_id(&self) -> Option<&T::Id> {
        self.selected().map(|e| e.id())
    }

    /// Cursor row index; `None` is the header.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_header_selected(&self) -> bool {
        self.cursor.is_none()
    }

    /// Move up one row. Row 0 moves onto the header.
    pub fn move_up(&mut self) {
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Move down one row. The header moves onto row 0.
    pub fn move_down(&mut self) {
        self.cursor = match self.cursor {
            None => self.clamp_index(0),
            Some(i) => self.clamp_index(i + 1),
        };
    }

    pub fn move_to_first(&mut self) {
        self.cursor = self.clamp_index(0);
    }

    pub fn move_to_last(&mut self) {
        self.cursor = self.entries.len().checked_sub(1);
    }

    pub fn page_up(&mut self, rows: usize) {
        self.cursor = self.cursor.map(|i| i.saturating_sub(rows));
    }

    pub fn page_down(&mut self, rows: usize) {
        let from = self.cursor.map(|i| i + rows).unwrap_or(rows.saturating_sub(1));
        self.cursor = self.clamp_index(from);
    }

    /// Mark or unmark a row. Returns whether the row is marked afterwards.
    pub fn toggle_multi_select(&mut self, id: &T::Id) -> bool {
        if self.marked.remove(id) {
            return false;
        }
        if self.position(id).is_none() {
            return false;
        }
        self.marked.insert(id.clone());
        true
    }

    pub fn is_multi_selected(&self, id: &T::Id) -> bool {
        self.marked.contains(id)
    }

    /// Marked entries in display order.
    pub fn multi_selection(&self) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|e| self.marked.contains(e.id()))
            .collect()
    }

    pub fn multi_selection_len(&self) -> usize {
        self.marked.len()
    }

    pub fn clear_multi_selection(&mut self) {
        self.marked.clear();
    }

    /// Select the next (or previous) declared column as the sort column.
    ///
    /// Only works while the header is focused; returns `false` otherwise.
    pub fn cycle_sort_column(&mut self, forward: bool) -> bool {
        if !self.is_header_selected() || self.columns.is_empty() {
            return false;
        }
        let len = self.columns.len();
        let current = self
            .sort_column
            .and_then(|c| self.columns.iter().position(|x| *x == c));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.sort_column = Some(self.columns[next]);
        self.resort();
        true
    }

    /// Flip the sort direction. Only works while the header is focused.
    pub fn toggle_sort_direction(&mut self) -> bool {
        if !self.is_header_selected() {
            return false;
        }
        self.direction = self.direction.toggled();
        self.resort();
        true
    }

    fn clamp_index(&self, index: usize) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(index.min(self.entries.len() - 1))
        }
    }

    /// Re-sort and keep the cursor on the same entry.
    fn resort(&mut self) {
        let selected = self.selected_id().cloned();
        self.sort_entries();
        if let Some(id) = selected {
            self.cursor = self.position(&id);
        }
    }

    fn sort_entries(&mut self) {
        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by(|a, b| self.compare_entries(a, b));
        self.entries = entries;
    }

    fn compare_entries(&self, a: &T, b: &T) -> Ordering {
        let primary = match self.sort_column {
            Some(column) => (self.compare)(column, a, b),
            None => Ordering::Equal,
        };
        let primary = if self.direction.is_inverted() {
            primary.reverse()
        } else {
            primary
        };

        // The fallback never follows the sort direction
        primary
            .then_with(|| b.kind_rank().cmp(&a.kind_rank()))
            .then_with(|| {
                a.sort_name()
                    .to_lowercase()
                    .cmp(&b.sort_name().to_lowercase())
            })
            .then_with(|| a.sort_name().cmp(b.sort_name()))
    }
}

impl<T, C> Debug for StableTable<T, C>
where
    T: TableEntry,
    C: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableTable")
            .field("columns", &self.columns)
            .field("sort_column", &self.sort_column)
            .field("direction", &self.direction)
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("marked", &self.marked.len())
            .finish()
    }
}
