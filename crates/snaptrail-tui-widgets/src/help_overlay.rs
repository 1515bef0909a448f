//! Help overlay listing the active key bindings.

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use snaptrail_tui_core::{KeyAction, KeybindManager, Theme};

/// One line of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub keys: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct HelpOverlay {
    visible: bool,
    entries: Vec<HelpEntry>,
}

impl HelpOverlay {
    /// Build the overlay from the bindings in effect.
    pub fn new(keybinds: &KeybindManager) -> Self {
        let entries = KeyAction::all()
            .iter()
            .filter_map(|&action| {
                let keys = keybinds
                    .get_bindings(action)
                    .iter()
                    .map(|kb| kb.to_display())
                    .collect::<Vec<_>>();
                if keys.is_empty() {
                    return None;
                }
                Some(HelpEntry {
                    keys: keys.join(", "),
                    description: action.description(),
                })
            })
            .collect();
        Self {
            visible: false,
            entries,
        }
    }

    pub fn entries(&self) -> &[HelpEntry] {
        &self.entries
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.visible {
            return;
        }

        let key_width = self
            .entries
            .iter()
            .map(|e| e.keys.chars().count())
            .max()
            .unwrap_or(1);
        let desc_width = self
            .entries
            .iter()
            .map(|e| e.description.len())
            .max()
            .unwrap_or(10);
        let width = (key_width + desc_width + 7) as u16;
        let height = self.entries.len() as u16 + 2;
        let overlay = crate::centered_rect(
            width.min(area.width.saturating_sub(2)),
            height.min(area.height.saturating_sub(2)),
            area,
        );
        frame.render_widget(Clear, overlay);

        let lines: Vec<Line> = self
            .entries
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:>width$}", entry.keys, width = key_width),
                        theme.primary_style().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  ", theme.muted_style()),
                    Span::styled(entry.description, theme.text_style()),
                ])
            })
            .collect();

        let block = Block::default()
            .title(Span::styled(" Keys ", theme.primary_style()))
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .style(theme.panel_style());

        frame.render_widget(Paragraph::new(lines).block(block), overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaptrail_tui_core::KeybindConfig;
    use std::collections::HashMap;

    #[test]
    fn test_lists_bindings_in_action_order() {
        let overlay = HelpOverlay::new(&KeybindManager::default());
        assert_eq!(overlay.entries().len(), KeyAction::all().len());
        assert_eq!(overlay.entries()[0].keys, "Q, Ctrl+C");
        assert_eq!(
            overlay.entries()[0].description,
            KeyAction::AppExit.description()
        );
    }

    #[test]
    fn test_unbound_actions_are_skipped() {
        let config = KeybindConfig::new(HashMap::from([(
            "action_menu".to_string(),
            "none".to_string(),
        )]));
        let overlay = HelpOverlay::new(&KeybindManager::new(&config));
        assert_eq!(overlay.entries().len(), KeyAction::all().len() - 1);
        assert!(overlay
            .entries()
            .iter()
            .all(|e| e.description != KeyAction::ActionMenu.description()));
    }

    #[test]
    fn test_toggle() {
        let mut overlay = HelpOverlay::new(&KeybindManager::default());
        assert!(!overlay.is_visible());
        overlay.toggle();
        assert!(overlay.is_visible());
        overlay.hide();
        assert!(!overlay.is_visible());
    }
}
