//! Change notifications for the directory being browsed.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Watches one directory at a time, non-recursively.
///
/// Notifications arrive on the watcher's own thread; `on_change` must hand
/// them over to the owning task (usually through a channel). The watch
/// stops when the watcher is dropped.
pub struct FsWatcher {
    watcher: RecommendedWatcher,
    watched: Arc<Mutex<Option<PathBuf>>>,
}

impl FsWatcher {
    /// Create a watcher calling `on_change` with the watched directory
    /// whenever something in it changes.
    pub fn new<F>(on_change: F) -> notify::Result<Self>
    where
        F: Fn(PathBuf) + Send + 'static,
    {
        let watched: Arc<Mutex<Option<PathBuf>>> = Arc::default();
        let current = Arc::clone(&watched);
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                let Some(path) = event.paths.first() else {
                    return;
                };
                let dir = match current.lock() {
                    Ok(current) => changed_dir(path, current.as_deref()),
                    Err(_) => changed_dir(path, None),
                };
                if let Some(dir) = dir {
                    on_change(dir);
                }
            }
            Err(e) => warn!(error = %e, "Filesystem watch error"),
        })?;

        Ok(Self { watcher, watched })
    }

    /// Create a watcher that forwards changed directories over a channel.
    pub fn channel() -> notify::Result<(Self, mpsc::UnboundedReceiver<PathBuf>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = Self::new(move |dir| {
            let _ = tx.send(dir);
        })?;
        Ok((watcher, rx))
    }

    /// Watch `dir` instead of the previous directory.
    pub fn watch(&mut self, dir: &Path) -> notify::Result<()> {
        if self.watched().as_deref() == Some(dir) {
            return Ok(());
        }
        self.unwatch();
        self.watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %dir.display(), "Watching directory");
        self.set_watched(Some(dir.to_path_buf()));
        Ok(())
    }

    /// Stop watching without dropping the watcher.
    pub fn unwatch(&mut self) {
        if let Some(previous) = self.watched() {
            self.set_watched(None);
            // The directory may already be gone
            if let Err(e) = self.watcher.unwatch(&previous) {
                debug!(path = %previous.display(), error = %e, "Unwatch failed");
            }
        }
    }

    pub fn watched(&self) -> Option<PathBuf> {
        self.watched.lock().ok().and_then(|w| w.clone())
    }

    fn set_watched(&self, dir: Option<PathBuf>) {
        if let Ok(mut watched) = self.watched.lock() {
            *watched = dir;
        }
    }
}

/// The directory whose listing an event on `path` invalidates.
///
/// Events on the watched directory itself (removed, renamed, permissions
/// changed) name that directory; everything else names a child of it.
fn changed_dir(path: &Path, watched: Option<&Path>) -> Option<PathBuf> {
    if watched == Some(path) {
        return Some(path.to_path_buf());
    }
    path.parent().map(Path::to_path_buf)
}

impl std::fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsWatcher")
            .field("watched", &self.watched())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_retarget() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let (mut watcher, _rx) = FsWatcher::channel().unwrap();

        watcher.watch(first.path()).unwrap();
        assert_eq!(watcher.watched().as_deref(), Some(first.path()));
        watcher.watch(second.path()).unwrap();
        assert_eq!(watcher.watched().as_deref(), Some(second.path()));
        watcher.unwatch();
        assert_eq!(watcher.watched(), None);
    }

    #[test]
    fn test_watch_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let (mut watcher, _rx) = FsWatcher::channel().unwrap();
        assert!(watcher.watch(&dir.path().join("missing")).is_err());
        assert_eq!(watcher.watched(), None);
    }

    #[tokio::test]
    async fn test_reports_new_file() {
        let dir = tempdir().unwrap();
        let (mut watcher, mut rx) = FsWatcher::channel().unwrap();
        watcher.watch(dir.path()).unwrap();

        std::fs::write(dir.path().join("new.txt"), "x").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            changed.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_changed_dir_of_child_is_parent() {
        let watched = Path::new("/tank/home");
        assert_eq!(
            changed_dir(Path::new("/tank/home/notes.md"), Some(watched)),
            Some(PathBuf::from("/tank/home"))
        );
        assert_eq!(
            changed_dir(Path::new("/tank/home"), Some(watched)),
            Some(PathBuf::from("/tank/home"))
        );
        assert_eq!(
            changed_dir(Path::new("/tank/home"), None),
            Some(PathBuf::from("/tank"))
        );
    }

    #[tokio::test]
    async fn test_reports_removed_watched_dir() {
        let dir = tempdir().unwrap();
        let current = dir.path().join("cur");
        std::fs::create_dir(&current).unwrap();
        let (mut watcher, mut rx) = FsWatcher::channel().unwrap();
        watcher.watch(&current).unwrap();

        std::fs::remove_dir(&current).unwrap();

        let mut reported = Vec::new();
        let mut wait = Duration::from_secs(5);
        while let Ok(Some(changed)) = tokio::time::timeout(wait, rx.recv()).await {
            reported.push(changed);
            wait = Duration::from_millis(200);
        }
        assert!(reported.contains(&current), "reported: {reported:?}");
    }
}
