//! Snapshot access for snaptrail.
//!
//! This crate exposes the read-only side of a ZFS dataset:
//! - Discover the dataset a path lives in
//! - List the snapshots of that dataset
//! - Map paths between the live tree and a snapshot
//!
//! Snapshots are read through the `.zfs/snapshot/<name>` control directory
//! that ZFS exposes at every dataset mountpoint, so no `zfs` binary or
//! library binding is needed.
//!
//! # Example
//!
//! ```no_run
//! use snaptrail_snapshot::{SnapshotStore, ZfsStore};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ZfsStore::new(Vec::new());
//! let live = Path::new("/tank/home/notes.txt");
//!
//! for snapshot in store.list_snapshots(live)? {
//!     let old = store.map_to_snapshot_path(live, &snapshot)?;
//!     println!("{} -> {}", snapshot.name, old.display());
//! }
//! # Ok(())
//! # }
//! ```

mod dataset;
mod error;
mod snapshot;
mod store;

pub use dataset::{Dataset, SNAPSHOT_DIR};
pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::{Snapshot, SnapshotId};
pub use store::{SnapshotStore, ZfsStore};
