//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! here so every host surface shares one binding table. Callers are expected
//! to suppress shortcuts while a text-entry element has focus (the
//! controller's `handle_key` does this).

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Add a default node at a computed position (Cmd/Ctrl+N).
    AddNode,
    /// Delete the current selection, cascading edges (Cmd/Ctrl+Backspace).
    DeleteSelection,

    Undo,
    Redo,
    Duplicate,
    SelectAll,
    /// Escape: clear the selection / cancel the in-flight gesture.
    Deselect,

    ZoomIn,
    ZoomOut,
    ZoomReset,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: ⌘ on macOS and Ctrl elsewhere both count as "command".
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `key` is the host's
    /// `KeyboardEvent.key` value (e.g. `"n"`, `"Backspace"`). Returns `None`
    /// for unbound combos.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        // Modifier combos first (most specific).
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "n" | "N" => Some(ShortcutAction::AddNode),
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "Backspace" | "Delete" => Some(ShortcutAction::DeleteSelection),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                _ => None,
            };
        }

        match key {
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
