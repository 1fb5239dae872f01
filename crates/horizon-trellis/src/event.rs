//! Normalized input events.
//!
//! Backends translate their native events into [`Event`] values and hand them
//! to [`Gui::handle_event`](crate::Gui::handle_event). Positions are in the
//! coordinate space of the root container.

use crate::geometry::Vector2f;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// Keyboard key codes the widgets react to.
///
/// Keys that produce text also arrive as [`Event::TextEntered`]; widgets that
/// edit text only look at the text event for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters used by shortcuts
    A, C, V, X, Z,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Enter, Tab,
    Space, Escape,

    /// Any other key.
    Unknown(u16),
}

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Modifiers held at the time.
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    /// A key without modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// A key with modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Whether Control (or Meta) is held, the "shortcut" modifier.
    pub fn is_shortcut(&self) -> bool {
        self.modifiers.control || self.modifiers.meta
    }
}

/// A normalized input event from the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A key went down.
    KeyPressed(KeyEvent),
    /// A key went up.
    KeyReleased(KeyEvent),
    /// A mouse button went down.
    MouseButtonPressed {
        /// The button.
        button: MouseButton,
        /// Pointer position.
        position: Vector2f,
    },
    /// A mouse button went up.
    MouseButtonReleased {
        /// The button.
        button: MouseButton,
        /// Pointer position.
        position: Vector2f,
    },
    /// The pointer moved.
    MouseMoved {
        /// Pointer position.
        position: Vector2f,
    },
    /// The vertical wheel turned.
    MouseWheelScrolled {
        /// Wheel ticks, positive away from the user.
        delta: f32,
        /// Pointer position.
        position: Vector2f,
    },
    /// The pointer entered the window.
    MouseEntered,
    /// The pointer left the window.
    MouseLeft,
    /// A finger touched the screen.
    TouchBegan {
        /// Finger index.
        finger: u32,
        /// Touch position.
        position: Vector2f,
    },
    /// A finger moved.
    TouchMoved {
        /// Finger index.
        finger: u32,
        /// Touch position.
        position: Vector2f,
    },
    /// A finger was lifted.
    TouchEnded {
        /// Finger index.
        finger: u32,
        /// Touch position.
        position: Vector2f,
    },
    /// A character was typed, as a Unicode code point.
    TextEntered(u32),
    /// The window was resized.
    Resized {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// The window gained keyboard focus.
    GainedFocus,
    /// The window lost keyboard focus.
    LostFocus,
    /// The window was asked to close.
    Closed,
}

impl Event {
    /// Convenience constructor for a left button press.
    pub fn left_press(x: f32, y: f32) -> Self {
        Self::MouseButtonPressed {
            button: MouseButton::Left,
            position: Vector2f::new(x, y),
        }
    }

    /// Convenience constructor for a left button release.
    pub fn left_release(x: f32, y: f32) -> Self {
        Self::MouseButtonReleased {
            button: MouseButton::Left,
            position: Vector2f::new(x, y),
        }
    }

    /// Convenience constructor for a pointer move.
    pub fn mouse_move(x: f32, y: f32) -> Self {
        Self::MouseMoved {
            position: Vector2f::new(x, y),
        }
    }

    /// Convenience constructor for a key press without modifiers.
    pub fn key(key: Key) -> Self {
        Self::KeyPressed(KeyEvent::new(key))
    }

    /// Convenience constructor for typed text.
    pub fn text(c: char) -> Self {
        Self::TextEntered(c as u32)
    }
}

/// Whether a typed code point should reach text widgets.
///
/// Control characters (below 32) and DEL are dropped; they arrive as key
/// events instead.
pub fn is_printable(code_point: u32) -> bool {
    code_point >= 32 && code_point != 127
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_filter() {
        assert!(!is_printable(8));
        assert!(!is_printable(13));
        assert!(!is_printable(127));
        assert!(is_printable(' ' as u32));
        assert!(is_printable('é' as u32));
    }

    #[test]
    fn test_shortcut_modifier() {
        assert!(KeyEvent::with_modifiers(Key::C, KeyboardModifiers::CTRL).is_shortcut());
        assert!(!KeyEvent::new(Key::C).is_shortcut());
        assert!(KeyboardModifiers::SHIFT.any());
        assert!(!KeyboardModifiers::NONE.any());
    }
}
