//! Live filesystem access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Link,
}

impl EntryKind {
    /// Classify a file type without following links.
    ///
    /// A link is a link first, whatever it points to.
    pub fn from_file_type(file_type: &FileType) -> Self {
        if file_type.is_symlink() {
            Self::Link
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Rank used to break sort ties; higher ranks sort first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Directory => 2,
            Self::File => 1,
            Self::Link => 0,
        }
    }

    /// Single character shown in listings.
    pub fn symbol(self) -> char {
        match self {
            Self::Directory => 'd',
            Self::File => '-',
            Self::Link => 'l',
        }
    }
}

/// The subset of metadata the browser compares and displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    /// Permission bits (`0o7777` mask).
    pub mode: u32,
}

impl FileStat {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            kind: EntryKind::from_file_type(&metadata.file_type()),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            mode: permission_bits(metadata),
        }
    }

    /// `ls -l` style permission string, e.g. `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(self.kind.symbol());
        for shift in [6u32, 3, 0] {
            let bits = (self.mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Synchronous access to the live tree.
pub trait LiveFs: Send + Sync {
    /// Absolute paths of the entries in `dir`.
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Metadata of `path`, not following links.
    fn stat_entry(&self, path: &Path) -> io::Result<FileStat>;

    /// Whether `path` resolves to a directory, following links.
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`LiveFs`] backed by `std::fs`.
#[derive(Debug, Clone)]
pub struct LocalFs {
    show_hidden: bool,
}

impl LocalFs {
    pub fn new() -> Self {
        Self { show_hidden: true }
    }

    /// Hide or show dot files.
    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }
}

impl LocalFs {
    /// Sorted paths of a directory listing. Unreadable entries are logged
    /// and left out.
    fn visible_paths<I>(&self, dir: &Path, entries: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = io::Result<PathBuf>>,
    {
        let mut paths = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !self.show_hidden && file_name(&path).starts_with('.') {
                continue;
            }
            paths.push(path);
        }
        // read_dir order is filesystem dependent
        paths.sort();
        paths
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveFs for LocalFs {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
        Ok(self.visible_paths(dir, entries))
    }

    fn stat_entry(&self, path: &Path) -> io::Result<FileStat> {
        std::fs::symlink_metadata(path).map(|m| FileStat::from_metadata(&m))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Final component of `path` as a display string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_kind_rank_order() {
        assert!(EntryKind::Directory.rank() > EntryKind::File.rank());
        assert!(EntryKind::File.rank() > EntryKind::Link.rank());
    }

    #[test]
    fn test_list_entries_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let entries = LocalFs::new().list_entries(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let entries = vec![
            Ok(PathBuf::from("/tank/b")),
            Err(io::Error::new(io::ErrorKind::Other, "bad dirent")),
            Ok(PathBuf::from("/tank/a")),
        ];
        let paths = LocalFs::new().visible_paths(Path::new("/tank"), entries);
        assert_eq!(paths, vec![PathBuf::from("/tank/a"), PathBuf::from("/tank/b")]);
    }

    #[test]
    fn test_list_entries_hidden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("shown"), "").unwrap();

        assert_eq!(LocalFs::new().list_entries(dir.path()).unwrap().len(), 2);
        let entries = LocalFs::new()
            .with_hidden(false)
            .list_entries(dir.path())
            .unwrap();
        assert_eq!(entries, vec![dir.path().join("shown")]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempdir().unwrap();
        let err = LocalFs::new()
            .list_entries(&dir.path().join("gone"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_stat_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f"), "hello").unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();

        let fs_impl = LocalFs::new();
        let stat = fs_impl.stat_entry(&dir.path().join("f")).unwrap();
        assert_eq!(stat.kind, EntryKind::File);
        assert_eq!(stat.size, 5);
        assert!(stat.modified.is_some());

        let stat = fs_impl.stat_entry(&dir.path().join("d")).unwrap();
        assert_eq!(stat.kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_entry_does_not_follow_links() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("link")).unwrap();

        let fs_impl = LocalFs::new();
        let stat = fs_impl.stat_entry(&dir.path().join("link")).unwrap();
        assert_eq!(stat.kind, EntryKind::Link);
        assert!(fs_impl.is_dir(&dir.path().join("link")));
    }

    #[test]
    fn test_mode_string() {
        let stat = FileStat {
            kind: EntryKind::Directory,
            size: 0,
            modified: None,
            mode: 0o755,
        };
        assert_eq!(stat.mode_string(), "drwxr-xr-x");
    }
}
