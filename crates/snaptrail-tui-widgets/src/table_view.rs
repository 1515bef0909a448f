//! Rendering of a [`StableTable`] as a bordered ratatui table.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, HighlightSpacing, Row, Table, TableState},
    Frame,
};
use snaptrail_core::{StableTable, TableEntry};
use snaptrail_tui_core::Theme;
use std::fmt::Debug;

/// How the cells of one kind of table are drawn.
pub trait ColumnRender<T, C> {
    fn title(&self, column: C) -> &'static str;

    fn constraint(&self, column: C) -> Constraint;

    fn cell(&self, entry: &T, column: C, theme: &Theme) -> Cell<'static>;

    /// Base style of a row, before selection and marks.
    fn row_style(&self, _entry: &T, _theme: &Theme) -> Style {
        Style::default()
    }
}

/// Marker column shown in front of marked rows.
const MARK: &str = "●";

/// A table pane.
///
/// The view keeps the scroll offset between frames; everything else comes
/// from the [`StableTable`] it draws.
#[derive(Debug, Default)]
pub struct TableView {
    title: String,
    state: TableState,
    page_rows: usize,
}

impl TableView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: TableState::default(),
            page_rows: 0,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Data rows visible in the last rendered frame.
    pub fn page_rows(&self) -> usize {
        self.page_rows.max(1)
    }

    /// Draw `table` into `area`.
    pub fn render<T, C, R>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        table: &StableTable<T, C>,
        renderer: &R,
        theme: &Theme,
        focused: bool,
    ) where
        T: TableEntry,
        C: Copy + Eq + Debug,
        R: ColumnRender<T, C>,
    {
        let columns = table.columns();

        let header_cells = std::iter::once(Cell::from(""))
            .chain(columns.iter().map(|&column| {
                let mut title = renderer.title(column).to_string();
                if table.sort_column() == Some(column) {
                    title.push(' ');
                    title.push_str(table.sort_direction().arrow());
                }
                Cell::from(title)
            }))
            .collect::<Vec<_>>();
        let header = Row::new(header_cells)
            .style(theme.header_style(focused && table.is_header_selected()));

        let rows = table.entries().iter().map(|entry| {
            let marked = table.is_multi_selected(entry.id());
            let mut style = renderer.row_style(entry, theme);
            if marked {
                style = style.patch(theme.marked_style());
            }
            let mark = if marked {
                Span::styled(MARK, theme.marked_style())
            } else {
                Span::raw(" ")
            };
            let cells = std::iter::once(Cell::from(mark))
                .chain(
                    columns
                        .iter()
                        .map(|&column| renderer.cell(entry, column, theme)),
                )
                .collect::<Vec<_>>();
            Row::new(cells).style(style)
        });

        let widths = std::iter::once(Constraint::Length(1))
            .chain(columns.iter().map(|&column| renderer.constraint(column)))
            .collect::<Vec<_>>();

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                theme.border_style(focused),
            ))
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .style(theme.panel_style());

        let highlight = if focused {
            theme.selection_style()
        } else {
            Style::default()
        };
        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(highlight)
            .highlight_symbol("▸")
            .highlight_spacing(HighlightSpacing::Always);

        // borders and the header row
        self.page_rows = usize::from(area.height.saturating_sub(3));

        match table.cursor() {
            Some(index) => self.state.select(Some(index)),
            None => {
                self.state.select(None);
                *self.state.offset_mut() = 0;
            }
        }

        frame.render_stateful_widget(widget, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[derive(Debug)]
    struct Item {
        id: String,
        size: u64,
    }

    impl TableEntry for Item {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn kind_rank(&self) -> u8 {
            0
        }

        fn sort_name(&self) -> &str {
            &self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Col {
        Name,
        Size,
    }

    struct Render;

    impl ColumnRender<Item, Col> for Render {
        fn title(&self, column: Col) -> &'static str {
            match column {
                Col::Name => "Name",
                Col::Size => "Size",
            }
        }

        fn constraint(&self, column: Col) -> Constraint {
            match column {
                Col::Name => Constraint::Min(8),
                Col::Size => Constraint::Length(6),
            }
        }

        fn cell(&self, entry: &Item, column: Col, _theme: &Theme) -> Cell<'static> {
            match column {
                Col::Name => Cell::from(entry.id.clone()),
                Col::Size => Cell::from(entry.size.to_string()),
            }
        }
    }

    fn table() -> StableTable<Item, Col> {
        let mut table = StableTable::new(|col, a: &Item, b: &Item| match col {
            Col::Name => a.id.cmp(&b.id),
            Col::Size => a.size.cmp(&b.size),
        });
        table.set_columns(vec![Col::Name, Col::Size], Some(Col::Size), false);
        table.set_data(
            (0..20)
                .map(|i| Item {
                    id: format!("item{i:02}"),
                    size: i,
                })
                .collect(),
        );
        table
    }

    fn draw(view: &mut TableView, table: &StableTable<Item, Col>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|frame| {
                view.render(
                    frame,
                    frame.area(),
                    table,
                    &Render,
                    &Theme::default(),
                    true,
                )
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_header_shows_sort_arrow() {
        let mut view = TableView::new("Files");
        let screen = draw(&mut view, &table());
        assert!(screen.contains("Size ▲"));
        assert!(screen.contains("Files"));
        assert!(screen.contains("item00"));
    }

    #[test]
    fn test_scrolls_to_cursor() {
        let mut t = table();
        t.move_to_last();
        let mut view = TableView::new("Files");
        let screen = draw(&mut view, &t);
        assert!(screen.contains("item19"));
        assert!(!screen.contains("item00"));
        assert_eq!(view.page_rows(), 5);
    }

    #[test]
    fn test_marked_rows_show_marker() {
        let mut t = table();
        t.toggle_multi_select(&"item01".to_string());
        let mut view = TableView::new("Files");
        let screen = draw(&mut view, &t);
        assert!(screen.contains("● item01"));
        assert!(!screen.contains("● item02"));
    }
}
