//! Errors raised by the path helpers.
//!
//! Domain crates define their own `thiserror` enums; this one only needs to
//! say what went wrong with which path.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    path: Option<PathBuf>,
    source: Option<io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or otherwise unusable path.
    InvalidInput,
    NotFound,
    PermissionDenied,
    /// Any other filesystem failure.
    Io,
}

impl ErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid path",
            Self::NotFound => "no such file or directory",
            Self::PermissionDenied => "permission denied",
            Self::Io => "cannot access",
        }
    }
}

impl From<io::ErrorKind> for ErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io,
        }
    }
}

impl Error {
    pub fn invalid_input() -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            path: None,
            source: None,
        }
    }

    /// Classify an IO failure on `path`.
    pub fn at(path: &Path, source: io::Error) -> Self {
        Self {
            kind: source.kind().into(),
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.kind.describe(), path.display()),
            None => f.write_str(self.kind.describe()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_io_kinds_are_classified() {
        let missing = Error::at(
            Path::new("/tank/gone"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.path(), Some(Path::new("/tank/gone")));
        assert_eq!(missing.to_string(), "no such file or directory: /tank/gone");
        assert!(StdError::source(&missing).is_some());

        let denied = Error::at(
            Path::new("/root"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(denied.kind(), ErrorKind::PermissionDenied);

        let other = Error::at(Path::new("/dev/x"), io::Error::other("boom"));
        assert_eq!(other.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_invalid_input_has_no_path() {
        let err = Error::invalid_input();
        assert_eq!(err.to_string(), "invalid path");
        assert!(err.path().is_none());
        assert!(StdError::source(&err).is_none());
    }
}
