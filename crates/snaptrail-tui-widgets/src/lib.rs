//! Widgets for the snaptrail TUI.
//!
//! - Sortable table view with header-row cursor and marked rows
//! - Column renderers for the file browser and the snapshot list
//! - Action menu, help overlay, status bar and toasts

pub mod action_dialog;
pub mod columns;
pub mod help_overlay;
pub mod status;
pub mod table_view;
pub mod toast;

pub use action_dialog::ActionDialog;
pub use columns::{diff_style, BrowserColumns, SnapshotColumns};
pub use help_overlay::HelpOverlay;
pub use status::StatusWidget;
pub use table_view::{ColumnRender, TableView};
pub use toast::{Toast, ToastManager, ToastType};

use ratatui::layout::Rect;

/// A rectangle of at most `width` x `height` centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
