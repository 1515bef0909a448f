//! Color themes for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name.
    pub name: String,

    // Background hierarchy
    /// Base background.
    pub background: Color,
    /// Panel background (side panes, dialogs).
    pub background_panel: Color,
    /// Element background (status bar, header row).
    pub background_element: Color,

    // Text colors
    pub text: Color,
    pub text_muted: Color,

    // Accent colors
    pub primary: Color,
    pub secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Border colors
    pub border: Color,
    /// Border of the focused pane.
    pub border_active: Color,

    // Diff colors
    /// Only present live.
    pub diff_added: Color,
    /// Only present in the snapshot.
    pub diff_deleted: Color,
    /// Present on both sides with different content.
    pub diff_modified: Color,
    /// Unchanged since the snapshot.
    pub diff_equal: Color,

    // Table rows
    /// Background of the cursor row.
    pub selection_bg: Color,
    /// Foreground of marked rows.
    pub marked: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Get a theme by name, falling back to the dark theme.
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "gruvbox" | "gruvbox-dark" => Self::gruvbox_dark(),
            _ => Self::dark(),
        }
    }

    /// List available theme names.
    pub fn available() -> Vec<&'static str> {
        vec!["dark", "light", "nord", "gruvbox"]
    }

    /// Default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),

            background: Color::Rgb(10, 10, 10),         // #0a0a0a
            background_panel: Color::Rgb(20, 20, 20),   // #141414
            background_element: Color::Rgb(30, 30, 30), // #1e1e1e

            text: Color::Rgb(250, 250, 250),       // #fafafa
            text_muted: Color::Rgb(128, 128, 128), // #808080

            primary: Color::Rgb(250, 178, 131),  // #fab283
            secondary: Color::Rgb(92, 156, 245), // #5c9cf5

            success: Color::Rgb(127, 216, 143), // #7fd88f
            warning: Color::Rgb(245, 167, 66),  // #f5a742
            error: Color::Rgb(224, 108, 117),   // #e06c75
            info: Color::Rgb(92, 156, 245),     // #5c9cf5

            border: Color::Rgb(60, 60, 60),
            border_active: Color::Rgb(250, 178, 131),

            diff_added: Color::Rgb(127, 216, 143),
            diff_deleted: Color::Rgb(224, 108, 117),
            diff_modified: Color::Rgb(229, 192, 123), // #e5c07b
            diff_equal: Color::Rgb(250, 250, 250),

            selection_bg: Color::Rgb(45, 45, 52),
            marked: Color::Rgb(157, 124, 216), // #9d7cd8
        }
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),

            background: Color::Rgb(255, 255, 255),
            background_panel: Color::Rgb(250, 250, 250),
            background_element: Color::Rgb(240, 240, 240),

            text: Color::Rgb(26, 26, 26),
            text_muted: Color::Rgb(110, 110, 110),

            primary: Color::Rgb(200, 100, 40),
            secondary: Color::Rgb(30, 100, 200),

            success: Color::Rgb(40, 140, 60),
            warning: Color::Rgb(190, 120, 0),
            error: Color::Rgb(200, 40, 50),
            info: Color::Rgb(30, 100, 200),

            border: Color::Rgb(200, 200, 200),
            border_active: Color::Rgb(200, 100, 40),

            diff_added: Color::Rgb(40, 140, 60),
            diff_deleted: Color::Rgb(200, 40, 50),
            diff_modified: Color::Rgb(160, 110, 0),
            diff_equal: Color::Rgb(26, 26, 26),

            selection_bg: Color::Rgb(220, 228, 240),
            marked: Color::Rgb(120, 60, 180),
        }
    }

    /// Nord theme.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),

            background: Color::Rgb(46, 52, 64),         // #2e3440
            background_panel: Color::Rgb(59, 66, 82),   // #3b4252
            background_element: Color::Rgb(67, 76, 94), // #434c5e

            text: Color::Rgb(236, 239, 244),       // #eceff4
            text_muted: Color::Rgb(129, 161, 193), // #81a1c1

            primary: Color::Rgb(136, 192, 208),   // #88c0d0
            secondary: Color::Rgb(129, 161, 193), // #81a1c1

            success: Color::Rgb(163, 190, 140), // #a3be8c
            warning: Color::Rgb(235, 203, 139), // #ebcb8b
            error: Color::Rgb(191, 97, 106),    // #bf616a
            info: Color::Rgb(94, 129, 172),     // #5e81ac

            border: Color::Rgb(76, 86, 106),
            border_active: Color::Rgb(136, 192, 208),

            diff_added: Color::Rgb(163, 190, 140),
            diff_deleted: Color::Rgb(191, 97, 106),
            diff_modified: Color::Rgb(235, 203, 139),
            diff_equal: Color::Rgb(236, 239, 244),

            selection_bg: Color::Rgb(76, 86, 106),
            marked: Color::Rgb(180, 142, 173), // #b48ead
        }
    }

    /// Gruvbox dark theme.
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox".to_string(),

            background: Color::Rgb(40, 40, 40),         // #282828
            background_panel: Color::Rgb(50, 48, 47),   // #32302f
            background_element: Color::Rgb(60, 56, 54), // #3c3836

            text: Color::Rgb(235, 219, 178),       // #ebdbb2
            text_muted: Color::Rgb(146, 131, 116), // #928374

            primary: Color::Rgb(254, 128, 25),   // #fe8019
            secondary: Color::Rgb(131, 165, 152), // #83a598

            success: Color::Rgb(184, 187, 38), // #b8bb26
            warning: Color::Rgb(250, 189, 47), // #fabd2f
            error: Color::Rgb(251, 73, 52),    // #fb4934
            info: Color::Rgb(131, 165, 152),

            border: Color::Rgb(80, 73, 69),
            border_active: Color::Rgb(254, 128, 25),

            diff_added: Color::Rgb(184, 187, 38),
            diff_deleted: Color::Rgb(251, 73, 52),
            diff_modified: Color::Rgb(250, 189, 47),
            diff_equal: Color::Rgb(235, 219, 178),

            selection_bg: Color::Rgb(80, 73, 69),
            marked: Color::Rgb(211, 134, 155), // #d3869b
        }
    }

    // Style helper methods

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Border style for a pane.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_active)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn panel_style(&self) -> Style {
        Style::default().bg(self.background_panel)
    }

    pub fn element_style(&self) -> Style {
        Style::default().bg(self.background_element)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    /// Header row style; highlighted when the cursor sits on it.
    pub fn header_style(&self, selected: bool) -> Style {
        let style = Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD);
        if selected {
            style.bg(self.selection_bg).add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    /// Style of the row under the cursor.
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a marked row.
    pub fn marked_style(&self) -> Style {
        Style::default()
            .fg(self.marked)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn diff_added_style(&self) -> Style {
        Style::default().fg(self.diff_added)
    }

    pub fn diff_deleted_style(&self) -> Style {
        Style::default()
            .fg(self.diff_deleted)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn diff_modified_style(&self) -> Style {
        Style::default().fg(self.diff_modified)
    }

    pub fn diff_equal_style(&self) -> Style {
        Style::default().fg(self.diff_equal)
    }
}
