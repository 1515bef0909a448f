//! Core browsing engine for snaptrail.
//!
//! This crate merges a live directory with the same directory inside a
//! snapshot and keeps the operator's place while they move around:
//! - Reconciliation of live and snapshot listings with diff classification
//! - A sortable table with a stable cursor and multi-selection
//! - Per-directory cursor memory and navigation
//! - Change notifications for the directory being browsed
//! - Configuration management (multi-source, JSONC support)

pub mod action;
pub mod config;
pub mod entry;
pub mod error;
pub mod fs;
pub mod memory;
pub mod navigation;
pub mod reconcile;
pub mod status;
pub mod table;
pub mod watch;

pub use action::{ActionId, ActionReceiver, ActionRequest};
pub use config::Config;
pub use entry::{
    snapshots_containing, BrowserColumn, BrowserEntry, DiffState, RealFile, SnapshotBrowserEntry,
    SnapshotColumn, SnapshotFile,
};
pub use error::{BrowseError, BrowseResult, ConfigError, CoreError, CoreResult};
pub use fs::{EntryKind, FileStat, LiveFs, LocalFs};
pub use memory::SelectionMemory;
pub use navigation::{BrowserTable, NavAction, NavigationController};
pub use reconcile::Reconciler;
pub use status::StatusSink;
pub use table::{SortDirection, StableTable, TableEntry};
pub use watch::FsWatcher;
