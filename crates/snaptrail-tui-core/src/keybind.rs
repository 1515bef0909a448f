//! Configurable keybind system.
//!
//! Bindings are strings such as `ctrl+c`, `shift+g` or `pagedown`; several
//! bindings for one action are separated by commas (`k,up`).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A keybind action identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    // Application
    AppExit,
    HelpToggle,

    // Cursor
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    First,
    Last,

    // Navigation
    NavigateBack,
    NavigateInto,
    Confirm,
    Refresh,

    // Selection
    ToggleMark,
    ClearMarks,

    // Panes
    FocusNext,
    FocusPrev,

    // Actions
    ActionMenu,
}

impl KeyAction {
    /// Get all actions, in matching priority order.
    pub fn all() -> &'static [KeyAction] {
        use KeyAction::*;
        &[
            AppExit,
            HelpToggle,
            CursorUp,
            CursorDown,
            PageUp,
            PageDown,
            First,
            Last,
            NavigateBack,
            NavigateInto,
            Confirm,
            Refresh,
            ToggleMark,
            ClearMarks,
            FocusNext,
            FocusPrev,
            ActionMenu,
        ]
    }

    /// Config name of the action.
    pub fn name(&self) -> &'static str {
        use KeyAction::*;
        match self {
            AppExit => "app_exit",
            HelpToggle => "help_toggle",
            CursorUp => "cursor_up",
            CursorDown => "cursor_down",
            PageUp => "page_up",
            PageDown => "page_down",
            First => "first",
            Last => "last",
            NavigateBack => "navigate_back",
            NavigateInto => "navigate_into",
            Confirm => "confirm",
            Refresh => "refresh",
            ToggleMark => "toggle_mark",
            ClearMarks => "clear_marks",
            FocusNext => "focus_next",
            FocusPrev => "focus_prev",
            ActionMenu => "action_menu",
        }
    }

    /// Look up an action by its config name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|a| a.name() == name)
    }

    /// Get the default keybind string for this action.
    pub fn default_binding(&self) -> &'static str {
        use KeyAction::*;
        match self {
            AppExit => "q,ctrl+c",
            HelpToggle => "?,f1",
            CursorUp => "up,k",
            CursorDown => "down,j",
            PageUp => "pageup,ctrl+b",
            PageDown => "pagedown,ctrl+f",
            First => "home,g",
            Last => "end,shift+g",
            NavigateBack => "left,h,backspace",
            NavigateInto => "right,l",
            Confirm => "enter",
            Refresh => "r,f5",
            ToggleMark => "space",
            ClearMarks => "escape",
            FocusNext => "tab",
            FocusPrev => "backtab",
            ActionMenu => "a",
        }
    }

    /// Get a human-readable description of this action.
    pub fn description(&self) -> &'static str {
        use KeyAction::*;
        match self {
            AppExit => "Exit the application",
            HelpToggle => "Toggle help",
            CursorUp => "Move the cursor up",
            CursorDown => "Move the cursor down",
            PageUp => "Move up one page",
            PageDown => "Move down one page",
            First => "Jump to the first entry",
            Last => "Jump to the last entry",
            NavigateBack => "Go to the parent directory (previous sort column on the header)",
            NavigateInto => "Enter the directory (next sort column on the header)",
            Confirm => "Enter the directory (flip sort direction on the header)",
            Refresh => "Reload the listing",
            ToggleMark => "Mark or unmark the entry",
            ClearMarks => "Clear all marks",
            FocusNext => "Focus the next pane",
            FocusPrev => "Focus the previous pane",
            ActionMenu => "Open the action menu",
        }
    }
}

/// A parsed keybind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keybind {
    /// The key name (e.g., "a", "enter", "escape").
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Keybind {
    /// Create a new keybind.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Parse a keybind string (e.g., "ctrl+c", "shift+g").
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s == "none" || s.is_empty() {
            return None;
        }
        // A literal plus sign
        if s == "+" {
            return Some(Self::new("+"));
        }

        let mut keybind = Keybind::new(String::new());
        for part in s.split('+') {
            match part {
                "ctrl" | "control" => keybind.ctrl = true,
                "alt" | "meta" | "option" => keybind.alt = true,
                "shift" => keybind.shift = true,
                "esc" => keybind.key = "escape".to_string(),
                "del" => keybind.key = "delete".to_string(),
                "pgup" => keybind.key = "pageup".to_string(),
                "pgdn" | "pgdown" => keybind.key = "pagedown".to_string(),
                "return" => keybind.key = "enter".to_string(),
                other if !other.is_empty() => keybind.key = other.to_string(),
                _ => {}
            }
        }

        if keybind.key.is_empty() {
            None
        } else {
            Some(keybind)
        }
    }

    /// Parse multiple keybinds separated by commas.
    pub fn parse_multi(s: &str) -> Vec<Self> {
        s.split(',')
            .filter_map(|part| Self::parse(part.trim()))
            .collect()
    }

    /// Check if this keybind matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let ctrl_match = self.ctrl == key.modifiers.contains(KeyModifiers::CONTROL);
        let alt_match = self.alt == key.modifiers.contains(KeyModifiers::ALT);
        // Terminals disagree on whether `?` carries SHIFT; only letters care
        let shift_match = match key.code {
            KeyCode::Char(c) if !c.is_alphabetic() => true,
            KeyCode::BackTab => true,
            _ => self.shift == key.modifiers.contains(KeyModifiers::SHIFT),
        };

        if !ctrl_match || !alt_match || !shift_match {
            return false;
        }

        match &key.code {
            KeyCode::Char(' ') => self.key == "space",
            KeyCode::Char(c) => self.key == c.to_lowercase().to_string(),
            KeyCode::Enter => self.key == "enter",
            KeyCode::Esc => self.key == "escape",
            KeyCode::Tab => self.key == "tab",
            KeyCode::BackTab => self.key == "backtab",
            KeyCode::Backspace => self.key == "backspace",
            KeyCode::Delete => self.key == "delete",
            KeyCode::Home => self.key == "home",
            KeyCode::End => self.key == "end",
            KeyCode::PageUp => self.key == "pageup",
            KeyCode::PageDown => self.key == "pagedown",
            KeyCode::Up => self.key == "up",
            KeyCode::Down => self.key == "down",
            KeyCode::Left => self.key == "left",
            KeyCode::Right => self.key == "right",
            KeyCode::F(n) => self.key == format!("f{n}"),
            _ => false,
        }
    }

    /// Convert to display string.
    pub fn to_display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }

        let key_display = match self.key.as_str() {
            "escape" => "Esc".to_string(),
            "enter" => "Enter".to_string(),
            "tab" => "Tab".to_string(),
            "backtab" => "Shift+Tab".to_string(),
            "backspace" => "Backspace".to_string(),
            "delete" => "Del".to_string(),
            "space" => "Space".to_string(),
            "home" => "Home".to_string(),
            "end" => "End".to_string(),
            "pageup" => "PgUp".to_string(),
            "pagedown" => "PgDn".to_string(),
            "up" => "↑".to_string(),
            "down" => "↓".to_string(),
            "left" => "←".to_string(),
            "right" => "→".to_string(),
            k => k.to_uppercase(),
        };
        parts.push(key_display);
        parts.join("+")
    }
}

/// Keybind configuration: action name to binding string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeybindConfig {
    pub bindings: HashMap<String, String>,
}

impl KeybindConfig {
    pub fn new(bindings: HashMap<String, String>) -> Self {
        Self { bindings }
    }

    /// Names in the config that match no action.
    pub fn unknown_actions(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .bindings
            .keys()
            .map(String::as_str)
            .filter(|name| KeyAction::from_name(name).is_none())
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

/// Keybind manager that handles matching and lookup.
#[derive(Debug, Clone)]
pub struct KeybindManager {
    actions: Vec<(KeyAction, Vec<Keybind>)>,
}

impl Default for KeybindManager {
    fn default() -> Self {
        Self::new(&KeybindConfig::default())
    }
}

impl KeybindManager {
    /// Create a keybind manager; actions missing from `config` keep their
    /// default bindings.
    pub fn new(config: &KeybindConfig) -> Self {
        let actions = KeyAction::all()
            .iter()
            .map(|action| {
                let binding = config
                    .bindings
                    .get(action.name())
                    .map(|s| s.as_str())
                    .unwrap_or(action.default_binding());
                (*action, Keybind::parse_multi(binding))
            })
            .collect();

        Self { actions }
    }

    /// Find the action for a key event.
    ///
    /// When several actions share a key, the one listed first in
    /// [`KeyAction::all`] wins.
    pub fn find_action(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.actions
            .iter()
            .find(|(_, keybinds)| keybinds.iter().any(|kb| kb.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Get the keybinds for an action.
    pub fn get_bindings(&self, action: KeyAction) -> &[Keybind] {
        self.actions
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, kbs)| kbs.as_slice())
            .unwrap_or(&[])
    }

    /// Get the display string for an action's primary binding.
    pub fn get_display(&self, action: KeyAction) -> String {
        self.get_bindings(action)
            .first()
            .map(|kb| kb.to_display())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_simple() {
        let kb = Keybind::parse("ctrl+c").unwrap();
        assert_eq!(kb.key, "c");
        assert!(kb.ctrl);
        assert!(!kb.alt);
        assert!(!kb.shift);
    }

    #[test]
    fn test_parse_multi() {
        let kbs = Keybind::parse_multi("k, up");
        assert_eq!(kbs.len(), 2);
        assert_eq!(kbs[0].key, "k");
        assert_eq!(kbs[1].key, "up");
    }

    #[test]
    fn test_parse_none() {
        assert!(Keybind::parse("none").is_none());
        assert!(Keybind::parse("ctrl+").is_none());
    }

    #[test]
    fn test_matches() {
        assert!(Keybind::new("c")
            .ctrl()
            .matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!Keybind::new("c").matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(Keybind::new("space").matches(&key(KeyCode::Char(' '), KeyModifiers::NONE)));
    }

    #[test]
    fn test_shift_only_matters_for_letters() {
        let question = Keybind::parse("?").unwrap();
        assert!(question.matches(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)));
        assert!(question.matches(&key(KeyCode::Char('?'), KeyModifiers::NONE)));

        let big_g = Keybind::parse("shift+g").unwrap();
        assert!(big_g.matches(&key(KeyCode::Char('G'), KeyModifiers::SHIFT)));
        assert!(!big_g.matches(&key(KeyCode::Char('g'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_manager_defaults() {
        let manager = KeybindManager::default();
        assert_eq!(
            manager.find_action(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyAction::AppExit)
        );
        assert_eq!(
            manager.find_action(&key(KeyCode::Left, KeyModifiers::NONE)),
            Some(KeyAction::NavigateBack)
        );
        assert_eq!(
            manager.find_action(&key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(KeyAction::Last)
        );
        assert_eq!(
            manager.find_action(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(KeyAction::FocusPrev)
        );
        assert_eq!(
            manager.find_action(&key(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_manager_overrides() {
        let config = KeybindConfig::new(HashMap::from([
            ("refresh".to_string(), "ctrl+r".to_string()),
            ("bogus".to_string(), "x".to_string()),
        ]));
        let manager = KeybindManager::new(&config);

        assert_eq!(
            manager.find_action(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(KeyAction::Refresh)
        );
        assert_eq!(
            manager.find_action(&key(KeyCode::Char('r'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(config.unknown_actions(), vec!["bogus"]);
    }

    #[test]
    fn test_action_names_roundtrip() {
        for action in KeyAction::all() {
            assert_eq!(KeyAction::from_name(action.name()), Some(*action));
            let json = serde_json::to_string(action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.name()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Keybind::new("c").ctrl().to_display(), "Ctrl+C");
        assert_eq!(Keybind::new("pagedown").to_display(), "PgDn");
        assert_eq!(Keybind::new("space").to_display(), "Space");
    }
}
