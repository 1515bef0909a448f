//! Core types and utilities for the snaptrail TUI.
//!
//! This crate provides foundational types shared across the TUI crates:
//! - Theme system with color definitions
//! - Keybind configuration and management
//! - Event handling

pub mod event;
pub mod keybind;
pub mod theme;

pub use event::{is_escape, is_quit, Event, EventHandler};
pub use keybind::{KeyAction, Keybind, KeybindConfig, KeybindManager};
pub use theme::Theme;
