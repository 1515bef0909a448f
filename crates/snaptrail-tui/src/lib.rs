//! Terminal UI for snaptrail.
//!
//! Built with ratatui: a file browser pane compared against a snapshot
//! list pane, with a dataset summary and a status bar.

pub mod app;
pub mod terminal;

pub use app::{App, AppOptions, Pane};
pub use terminal::{install_panic_hook, restore_terminal};
