//! Per-directory cursor memory.

use crate::table::TableEntry;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Where the cursor was when a directory was last left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remembered<Id> {
    Header,
    Entry { id: Id, index: usize },
}

/// Remembers the cursor of every visited directory.
#[derive(Debug, Clone)]
pub struct SelectionMemory<Id> {
    entries: HashMap<PathBuf, Remembered<Id>>,
}

impl<Id: Clone + Eq + Hash> SelectionMemory<Id> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record the cursor of `path` before its data is replaced.
    ///
    /// `id == None` records the header row.
    pub fn record(&mut self, path: &Path, id: Option<Id>, index: usize) {
        let remembered = match id {
            Some(id) => Remembered::Entry { id, index },
            None => Remembered::Header,
        };
        self.entries.insert(path.to_path_buf(), remembered);
    }

    /// Decide which entry to select after `path` was (re)loaded.
    pub fn restore<T>(&self, path: &Path, entries: &[T]) -> Option<Id>
    where
        T: TableEntry<Id = Id>,
    {
        match self.entries.get(path) {
            None => entries.first().map(|e| e.id().clone()),
            Some(Remembered::Header) => None,
            Some(Remembered::Entry { id, index }) => {
                if entries.iter().any(|e| e.id() == id) {
                    return Some(id.clone());
                }
                let last = entries.len().checked_sub(1)?;
                entries.get((*index).min(last)).map(|e| e.id().clone())
            }
        }
    }

    /// The remembered entry id of `path`, ignoring header memories.
    pub fn remembered_id(&self, path: &Path) -> Option<&Id> {
        match self.entries.get(path)? {
            Remembered::Entry { id, .. } => Some(id),
            Remembered::Header => None,
        }
    }
}

impl<Id: Clone + Eq + Hash> Default for SelectionMemory<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(String);

    impl TableEntry for Row {
        type Id = String;

        fn id(&self) -> &String {
            &self.0
        }

        fn kind_rank(&self) -> u8 {
            0
        }

        fn sort_name(&self) -> &str {
            &self.0
        }
    }

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|s| Row(s.to_string())).collect()
    }

    #[test]
    fn test_no_memory_selects_first() {
        let memory = SelectionMemory::<String>::new();
        let dir = Path::new("/a");
        assert_eq!(memory.restore(dir, &rows(&["x", "y"])), Some("x".into()));
        assert_eq!(memory.restore(dir, &rows(&[])), None);
    }

    #[test]
    fn test_header_memory() {
        let mut memory = SelectionMemory::<String>::new();
        memory.record(Path::new("/a"), None, 3);
        assert_eq!(memory.restore(Path::new("/a"), &rows(&["x"])), None);
        assert_eq!(memory.remembered_id(Path::new("/a")), None);
    }

    #[test]
    fn test_remembered_id() {
        let mut memory = SelectionMemory::new();
        memory.record(Path::new("/a"), Some("y".to_string()), 1);
        assert_eq!(
            memory.restore(Path::new("/a"), &rows(&["w", "x", "y"])),
            Some("y".into())
        );
    }

    #[test]
    fn test_clamps_index_when_id_gone() {
        let mut memory = SelectionMemory::new();
        memory.record(Path::new("/a"), Some("gone".to_string()), 5);
        assert_eq!(
            memory.restore(Path::new("/a"), &rows(&["x", "y"])),
            Some("y".into())
        );
        memory.record(Path::new("/a"), Some("gone".to_string()), 0);
        assert_eq!(
            memory.restore(Path::new("/a"), &rows(&["x", "y"])),
            Some("x".into())
        );
        assert_eq!(memory.restore(Path::new("/a"), &rows(&[])), None);
    }
}
