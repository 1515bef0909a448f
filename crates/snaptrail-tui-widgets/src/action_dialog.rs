//! Action menu for the cursor entry or the marked entries.
//!
//! Opening the menu hands back a receiver that resolves once: with the
//! chosen request, or closed when the menu is dismissed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use snaptrail_core::{ActionId, ActionReceiver, ActionRequest};
use snaptrail_tui_core::Theme;
use std::path::PathBuf;
use tokio::sync::oneshot;

use crate::centered_rect;

#[derive(Debug)]
pub struct ActionDialog {
    targets: Vec<PathBuf>,
    actions: Vec<ActionId>,
    state: ListState,
    sender: Option<oneshot::Sender<ActionRequest>>,
}

impl ActionDialog {
    /// Open the menu for `targets` with the given choices.
    pub fn open(targets: Vec<PathBuf>, actions: Vec<ActionId>) -> (Self, ActionReceiver) {
        let (sender, receiver) = oneshot::channel();
        let mut state = ListState::default();
        if !actions.is_empty() {
            state.select(Some(0));
        }
        let dialog = Self {
            targets,
            actions,
            state,
            sender: Some(sender),
        };
        (dialog, receiver)
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn selected_action(&self) -> Option<ActionId> {
        self.state
            .selected()
            .and_then(|i| self.actions.get(i))
            .copied()
    }

    /// Whether the menu has been answered or dismissed.
    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Handle a key. Returns true once the menu is closed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let last = self.actions.len().saturating_sub(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.dismiss(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.dismiss(),
            KeyCode::Enter => self.confirm(),
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.state.selected() {
                    self.state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(i) = self.state.selected() {
                    self.state.select(Some((i + 1).min(last)));
                }
            }
            KeyCode::Home => {
                if !self.actions.is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                if !self.actions.is_empty() {
                    self.state.select(Some(last));
                }
            }
            _ => {}
        }
        self.is_closed()
    }

    fn confirm(&mut self) {
        let Some(action) = self.selected_action() else {
            return;
        };
        if let Some(sender) = self.sender.take() {
            let request = ActionRequest {
                action,
                targets: self.targets.clone(),
            };
            // A dropped receiver means nobody is waiting any more
            if sender.send(request).is_err() {
                tracing::debug!("Action chosen after the receiver went away");
            }
        }
    }

    /// Close without a choice; the receiver sees the channel close.
    pub fn dismiss(&mut self) {
        self.sender = None;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = (self.actions.len() as u16 + 5).min(area.height);
        let dialog_area = centered_rect(48, height, area);
        frame.render_widget(Clear, dialog_area);

        let subject = match self.targets.as_slice() {
            [] => "current directory".to_string(),
            [one] => one
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| one.display().to_string()),
            many => format!("{} marked entries", many.len()),
        };

        let block = Block::default()
            .title(Span::styled(
                " Actions ",
                theme.primary_style().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .style(theme.panel_style());
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let subject_area = Rect::new(inner.x, inner.y, inner.width, 1.min(inner.height));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" for ", theme.muted_style()),
                Span::styled(subject, theme.text_style()),
            ])),
            subject_area,
        );

        let list_area = Rect::new(
            inner.x,
            inner.y.saturating_add(2),
            inner.width,
            inner.height.saturating_sub(2),
        );
        let items: Vec<ListItem> = self
            .actions
            .iter()
            .map(|action| ListItem::new(Line::from(format!(" {}", action.label()))))
            .collect();
        let list = List::new(items)
            .style(theme.text_style())
            .highlight_style(theme.selection_style())
            .highlight_symbol("▸");
        frame.render_stateful_widget(list, list_area, &mut self.state);
    }
}
