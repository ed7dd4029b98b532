//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` plus modifiers to semantic `ShortcutAction`s.
//! Keys typed into a text input or an inline-edited layer never resolve,
//! so Backspace keeps deleting characters there.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected layer.
    Delete,
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `typing` is true when focus is in an input, textarea, or
    /// contenteditable element. Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers, typing: bool) -> Option<ShortcutAction> {
        if typing || modifiers.has_command() {
            return None;
        }
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
