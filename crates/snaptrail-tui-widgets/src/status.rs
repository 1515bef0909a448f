//! Status bar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use snaptrail_tui_core::Theme;
use std::path::{Path, PathBuf};

/// One-line summary of where the operator is.
#[derive(Debug, Clone, Default)]
pub struct StatusWidget {
    path: PathBuf,
    snapshot: Option<String>,
    entries: usize,
    marked: usize,
    sort: Option<String>,
    watching: bool,
}

impl StatusWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_path(&mut self, path: &Path) {
        self.path = path.to_path_buf();
    }

    pub fn set_snapshot(&mut self, snapshot: Option<&str>) {
        self.snapshot = snapshot.map(str::to_string);
    }

    pub fn set_counts(&mut self, entries: usize, marked: usize) {
        self.entries = entries;
        self.marked = marked;
    }

    /// Current sort, e.g. `Name ▲`.
    pub fn set_sort(&mut self, sort: Option<String>) {
        self.sort = sort;
    }

    pub fn set_watching(&mut self, watching: bool) {
        self.watching = watching;
    }

    fn left_spans<'a>(&'a self, theme: &Theme) -> Vec<Span<'a>> {
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(self.path.display().to_string(), theme.bold()),
        ];
        match &self.snapshot {
            Some(name) => {
                spans.push(Span::styled(" @ ", theme.muted_style()));
                spans.push(Span::styled(name.as_str(), theme.primary_style()));
            }
            None => spans.push(Span::styled("  (live)", theme.muted_style())),
        }
        spans
    }

    fn right_spans<'a>(&'a self, theme: &Theme) -> Vec<Span<'a>> {
        let mut parts = vec![Span::styled(
            format!("{} entries", self.entries),
            theme.muted_style(),
        )];
        if self.marked > 0 {
            parts.push(Span::styled(" │ ", theme.muted_style()));
            parts.push(Span::styled(
                format!("{} marked", self.marked),
                theme.secondary_style(),
            ));
        }
        if let Some(sort) = &self.sort {
            parts.push(Span::styled(" │ ", theme.muted_style()));
            parts.push(Span::styled(sort.as_str(), theme.muted_style()));
        }
        if self.watching {
            parts.push(Span::styled(" │ ", theme.muted_style()));
            parts.push(Span::styled("watching", theme.success_style()));
        }
        parts
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = self.left_spans(theme);
        let right = self.right_spans(theme);

        let left_len: usize = spans.iter().map(|s| s.width()).sum();
        let right_len: usize = right.iter().map(|s| s.width()).sum();
        let spacing = (area.width as usize).saturating_sub(left_len + right_len + 1);
        if spacing > 0 {
            spans.push(Span::raw(" ".repeat(spacing)));
        }
        spans.extend(right);
        spans.push(Span::raw(" "));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(theme.element_style()),
            area,
        );
    }
}
