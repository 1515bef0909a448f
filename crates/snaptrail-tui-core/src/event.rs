//! Event handling for the TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A tick event for periodic updates.
    Tick,
    /// Something changed inside this directory.
    FsChanged(PathBuf),
}

/// Handles events from the terminal and other sources.
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a sender for injecting events from other sources.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Start reading terminal events.
    ///
    /// Terminal polling blocks, so it runs on the blocking pool. The loop
    /// ends once the handler is dropped.
    pub fn start(&self, tick_rate: Duration) {
        let sender = self.sender.clone();
        tokio::task::spawn_blocking(move || loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    // Windows reports key releases as well
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("Error reading event: {}", e);
                        continue;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    tracing::warn!("Error polling events: {}", e);
                    Event::Tick
                }
            };
            if sender.send(event).is_err() {
                break;
            }
        });
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Take every event that is already queued.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a key event is Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Check if a key event is Escape.
pub fn is_escape(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_helpers() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(is_escape(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn test_injected_events_arrive_in_order() {
        let mut events = EventHandler::new();
        let sender = events.sender();
        sender.send(Event::FsChanged(PathBuf::from("/tank"))).unwrap();
        sender.send(Event::Tick).unwrap();

        assert!(matches!(
            events.next().await,
            Some(Event::FsChanged(p)) if p == PathBuf::from("/tank")
        ));
        assert!(matches!(events.drain().as_slice(), [Event::Tick]));
        assert!(events.drain().is_empty());
    }
}
