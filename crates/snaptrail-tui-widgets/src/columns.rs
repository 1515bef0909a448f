//! Column renderers for the browser and snapshot tables.

use bytesize::ByteSize;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::Span,
    widgets::Cell,
};
use snaptrail_core::{
    BrowserColumn, BrowserEntry, DiffState, EntryKind, SnapshotBrowserEntry, SnapshotColumn,
};
use snaptrail_tui_core::Theme;

use crate::table_view::ColumnRender;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Style for a diff state.
pub fn diff_style(theme: &Theme, state: DiffState) -> Style {
    match state {
        DiffState::Added => theme.diff_added_style(),
        DiffState::Deleted => theme.diff_deleted_style(),
        DiffState::Modified => theme.diff_modified_style(),
        DiffState::Equal => theme.diff_equal_style(),
        DiffState::Unknown => theme.text_style(),
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Renders [`BrowserEntry`] rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserColumns;

impl ColumnRender<BrowserEntry, BrowserColumn> for BrowserColumns {
    fn title(&self, column: BrowserColumn) -> &'static str {
        column.title()
    }

    fn constraint(&self, column: BrowserColumn) -> Constraint {
        match column {
            BrowserColumn::Name => Constraint::Min(16),
            BrowserColumn::Diff => Constraint::Length(8),
            BrowserColumn::Size => Constraint::Length(10),
            BrowserColumn::Modified => Constraint::Length(16),
            BrowserColumn::Mode => Constraint::Length(10),
        }
    }

    fn cell(&self, entry: &BrowserEntry, column: BrowserColumn, theme: &Theme) -> Cell<'static> {
        match column {
            BrowserColumn::Name => {
                let mut name = entry.name.clone();
                match entry.kind {
                    EntryKind::Directory => name.push('/'),
                    EntryKind::Link => name.push('@'),
                    EntryKind::File => {}
                }
                let style = if entry.is_directory() {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Cell::from(Span::styled(name, style))
            }
            BrowserColumn::Diff => Cell::from(Span::styled(
                format!("{} {}", entry.diff_state.symbol(), entry.diff_state.label()),
                diff_style(theme, entry.diff_state),
            )),
            BrowserColumn::Size => {
                let size = if entry.is_directory() {
                    "-".to_string()
                } else {
                    ByteSize::b(entry.size()).to_string()
                };
                Cell::from(size)
            }
            BrowserColumn::Modified => Cell::from(format_time(entry.modified())),
            BrowserColumn::Mode => {
                Cell::from(Span::styled(entry.stat().mode_string(), theme.muted_style()))
            }
        }
    }

    fn row_style(&self, entry: &BrowserEntry, theme: &Theme) -> Style {
        diff_style(theme, entry.diff_state)
    }
}

/// Renders [`SnapshotBrowserEntry`] rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotColumns;

impl ColumnRender<SnapshotBrowserEntry, SnapshotColumn> for SnapshotColumns {
    fn title(&self, column: SnapshotColumn) -> &'static str {
        column.title()
    }

    fn constraint(&self, column: SnapshotColumn) -> Constraint {
        match column {
            SnapshotColumn::Name => Constraint::Min(12),
            SnapshotColumn::Created => Constraint::Length(16),
            SnapshotColumn::Contains => Constraint::Length(3),
        }
    }

    fn cell(
        &self,
        entry: &SnapshotBrowserEntry,
        column: SnapshotColumn,
        theme: &Theme,
    ) -> Cell<'static> {
        match column {
            SnapshotColumn::Name => Cell::from(entry.snapshot.name.clone()),
            SnapshotColumn::Created => Cell::from(format_time(Some(entry.snapshot.created))),
            SnapshotColumn::Contains => {
                if entry.contains_tracked {
                    Cell::from(Span::styled("✓", theme.success_style()))
                } else {
                    Cell::from("")
                }
            }
        }
    }

    fn row_style(&self, entry: &SnapshotBrowserEntry, theme: &Theme) -> Style {
        if entry.contains_tracked {
            theme.text_style()
        } else {
            theme.muted_style()
        }
    }
}
