//! Command handlers for the snaptrail CLI.
//!
//! The interactive browser lives in `browse`; `snapshots` and `diff` are the
//! non-interactive views over the same store and reconciler.

pub mod browse;
pub mod diff;
pub mod logging;
pub mod snapshots;

pub use browse::*;
pub use diff::*;
pub use logging::*;
pub use snapshots::*;

use snaptrail_core::{Config, LiveFs, LocalFs};
use snaptrail_snapshot::{SnapshotStore, ZfsStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Loaded configuration with the command line overrides applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub datasets: Vec<PathBuf>,
    pub watch: bool,
}

impl Settings {
    /// Command line datasets come after the configured ones; duplicates are
    /// dropped.
    pub fn new(config: Config, extra_datasets: Vec<PathBuf>, no_watch: bool) -> Self {
        let mut datasets = config.datasets().to_vec();
        for dataset in extra_datasets {
            if !datasets.contains(&dataset) {
                datasets.push(dataset);
            }
        }
        let watch = config.should_watch() && !no_watch;
        Self {
            config,
            datasets,
            watch,
        }
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        Arc::new(ZfsStore::new(self.datasets.clone()))
    }

    pub fn fs(&self) -> Arc<dyn LiveFs> {
        Arc::new(LocalFs::new().with_hidden(self.config.should_show_hidden()))
    }
}

/// Print version information.
pub fn print_version() {
    println!("snaptrail {}", env!("CARGO_PKG_VERSION"));
}
