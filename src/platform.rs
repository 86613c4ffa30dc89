//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Modifier for wizard shortcuts. Terminals on every platform deliver Ctrl;
/// Cmd rarely reaches a terminal app on macOS.
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Shortcut display for hints
/// - macOS: "⌃N"
/// - Linux/Windows: "Ctrl+N"
#[cfg(target_os = "macos")]
mod labels {
    pub const NEXT: &str = "⌃N";
    pub const PREVIOUS: &str = "⌃P";
    pub const ADD_ENTRY: &str = "⌃A";
    pub const REMOVE_ENTRY: &str = "⌃D";
}

#[cfg(not(target_os = "macos"))]
mod labels {
    pub const NEXT: &str = "Ctrl+N";
    pub const PREVIOUS: &str = "Ctrl+P";
    pub const ADD_ENTRY: &str = "Ctrl+A";
    pub const REMOVE_ENTRY: &str = "Ctrl+D";
}

pub use labels::{ADD_ENTRY, NEXT, PREVIOUS, REMOVE_ENTRY};
