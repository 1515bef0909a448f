//! Toast notifications.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use snaptrail_core::StatusSink;
use std::time::{Duration, Instant};

use snaptrail_tui_core::Theme;

/// Toast notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Error,
    Info,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub toast_type: ToastType,
    pub title: String,
    pub message: Option<String>,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(toast_type: ToastType, title: impl Into<String>) -> Self {
        Self {
            toast_type,
            title: title.into(),
            message: None,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastType::Success, title)
    }

    /// Errors stay up longer.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastType::Error, title).with_duration(Duration::from_secs(5))
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastType::Info, title)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// In the last fifth of its lifetime.
    pub fn is_fading(&self) -> bool {
        let elapsed = self.created_at.elapsed().as_secs_f32();
        elapsed / self.duration.as_secs_f32().max(f32::EPSILON) > 0.8
    }
}

/// Stack of toasts in the top-right corner.
#[derive(Debug, Clone, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    /// Most toasts kept at once; the oldest go first.
    const MAX_TOASTS: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
        if self.toasts.len() > Self::MAX_TOASTS {
            let excess = self.toasts.len() - Self::MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }

    /// Remove expired toasts. Returns true if any were removed.
    pub fn cleanup(&mut self) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired());
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let toast_width = 44u16.min(area.width);
        let mut y = area.y + 1;

        for toast in &self.toasts {
            let height = if toast.message.is_some() { 4 } else { 3 };
            if y + height > area.y + area.height {
                break;
            }

            let toast_area = Rect::new(
                area.x + area.width.saturating_sub(toast_width + 1),
                y,
                toast_width,
                height,
            );
            Self::render_toast(frame, toast_area, toast, theme);
            y += height;
        }
    }

    fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast, theme: &Theme) {
        frame.render_widget(Clear, area);

        let (icon, color) = match toast.toast_type {
            ToastType::Success => ("✓", theme.success),
            ToastType::Error => ("✗", theme.error),
            ToastType::Info => ("i", theme.info),
        };

        let mut accent = Style::default().fg(color);
        let mut text_style = theme.text_style();
        if toast.is_fading() {
            accent = accent.add_modifier(Modifier::DIM);
            text_style = theme.muted_style();
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(accent)
            .style(theme.panel_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{icon} "), accent),
            Span::styled(toast.title.as_str(), text_style),
        ])];
        if let Some(msg) = &toast.message {
            lines.push(Line::from(Span::styled(msg.as_str(), theme.muted_style())));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Status messages surface as toasts and are logged as well.
impl StatusSink for ToastManager {
    fn info(&mut self, message: &str) {
        tracing::info!("{message}");
        self.push(Toast::info(message));
    }

    fn error(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.push(Toast::error(message));
    }
}
