//! Input events fed to the tree by its host.

use crate::rows::RowId;

/// Key codes the tree reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    /// Function keys F1-F12
    F(u8),
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// No modifier is held.
    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key press without modifiers.
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add shift modifier
    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

/// A mouse press, release or move in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub x: u16,
    pub y: u16,
    /// Button pressed, released, or held while moving.
    pub button: MouseButton,
    pub modifiers: Modifiers,
    /// Click count reported by the host (2 for a double click).
    pub clicks: u8,
}

impl MouseInput {
    pub const fn new(button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            button,
            modifiers: Modifiers::NONE,
            clicks: 1,
        }
    }

    /// Left button at a position.
    pub const fn left(x: u16, y: u16) -> Self {
        Self::new(MouseButton::Left, x, y)
    }

    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as the second click of a double click.
    pub const fn double(mut self) -> Self {
        self.clicks = 2;
        self
    }
}

/// What lies under the pointer, resolved against the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHit {
    pub row: RowId,
    /// Flat index of the row.
    pub index: usize,
    /// The pointer is on the expand/collapse glyph.
    pub on_expander: bool,
    /// Node control under the pointer.
    pub control: Option<usize>,
    /// Vertical position within the row, 0.0 (top) to 1.0 (bottom).
    pub fraction: f32,
}

/// A pointer edge translated from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(MouseInput),
    Up(MouseInput),
    Move(MouseInput),
}

// Conversion from crossterm types
impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(modifiers: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: modifiers.contains(KeyModifiers::SHIFT),
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            alt: modifiers.contains(KeyModifiers::ALT),
        }
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(button: crossterm::event::MouseButton) -> Self {
        match button {
            crossterm::event::MouseButton::Left => MouseButton::Left,
            crossterm::event::MouseButton::Right => MouseButton::Right,
            crossterm::event::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

impl KeyInput {
    /// Translate a crossterm key press. Releases and unsupported keys yield `None`.
    pub fn from_crossterm(event: &crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event::{KeyCode, KeyEventKind};
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match event.code {
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::F(n) => Key::F(n),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::Delete => Key::Delete,
            _ => return None,
        };
        Some(KeyInput::new(key).with_modifiers(event.modifiers.into()))
    }
}

impl PointerEvent {
    /// Translate a crossterm mouse event; positions are made relative to
    /// `origin` (the tree's top-left corner). Scroll events yield `None`.
    pub fn from_crossterm(event: &crossterm::event::MouseEvent, origin: (u16, u16)) -> Option<Self> {
        use crossterm::event::MouseEventKind;
        let x = event.column.checked_sub(origin.0)?;
        let y = event.row.checked_sub(origin.1)?;
        let modifiers = Modifiers::from(event.modifiers);
        let input = |button: crossterm::event::MouseButton| {
            MouseInput::new(button.into(), x, y).with_modifiers(modifiers)
        };
        match event.kind {
            MouseEventKind::Down(button) => Some(PointerEvent::Down(input(button))),
            MouseEventKind::Up(button) => Some(PointerEvent::Up(input(button))),
            MouseEventKind::Drag(button) => Some(PointerEvent::Move(input(button))),
            _ => None,
        }
    }
}
