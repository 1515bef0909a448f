//! Path utilities.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Get the snaptrail configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/snaptrail` if set
/// - `~/.config/snaptrail` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("snaptrail"))
}

/// Get the log directory path.
pub fn logs_dir() -> PathBuf {
    // macOS: ~/Library/Logs/snaptrail
    // Linux: ~/.local/state/snaptrail/logs
    // Windows: %LOCALAPPDATA%/snaptrail/logs

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library/Logs/snaptrail");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(state_dir) = dirs::state_dir() {
            return state_dir.join("snaptrail/logs");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".local/state/snaptrail/logs");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_app) = dirs::data_local_dir() {
            return local_app.join("snaptrail/logs");
        }
    }

    PathBuf::from(".snaptrail/logs")
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist and does
/// not resolve symlinks, so a link the user navigated through stays visible.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Parent directory of `path`, or `path` itself at the filesystem root.
pub fn parent_or_self(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Resolve a user supplied start path into an absolute, normalized path
/// that exists on disk.
pub fn resolve_start(path: &Path, cwd: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_input());
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let normalized = normalize(&absolute);

    // symlink_metadata so a dangling link is still a valid start target
    std::fs::symlink_metadata(&normalized).map_err(|e| Error::at(&normalized, e))?;

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_config_dir() {
        if let Some(dir) = config_dir() {
            assert!(dir.ends_with("snaptrail"));
        }
    }

    #[test]
    fn test_normalize() {
        let path = Path::new("/home/user/./project/../project/src");
        assert_eq!(normalize(path), PathBuf::from("/home/user/project/src"));
    }

    #[test]
    fn test_parent_or_self_at_root() {
        assert_eq!(parent_or_self(Path::new("/")), PathBuf::from("/"));
        assert_eq!(parent_or_self(Path::new("/a/b")), PathBuf::from("/a"));
    }

    #[test]
    fn test_resolve_start_relative() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();

        let resolved = resolve_start(Path::new("./data/../data"), dir.path()).unwrap();
        assert_eq!(resolved, dir.path().join("data"));
    }

    #[test]
    fn test_resolve_start_missing() {
        let dir = tempdir().unwrap();
        let err = resolve_start(Path::new("missing"), dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_start_empty() {
        let err = resolve_start(Path::new(""), Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
