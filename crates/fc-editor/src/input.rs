//! Input abstraction layer.
//!
//! Normalizes host pointer/wheel/keyboard events into a unified `InputEvent`
//! enum consumed by the interaction controller. Positions are screen-space;
//! the controller converts to canvas space through the board's viewport.

use fc_core::Point;

/// Modifier key state accompanying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform-neutral "command": ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// A normalized input event from the host surface.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Point,
        modifiers: Modifiers,
    },
    /// Scroll wheel / trackpad. `delta` is the raw two-axis scroll amount.
    Wheel {
        pos: Point,
        delta: Point,
        modifiers: Modifiers,
    },
    /// Keyboard, `key` as the host reports it (e.g. `"z"`, `"Backspace"`).
    Key {
        key: String,
        modifiers: Modifiers,
    },
}
