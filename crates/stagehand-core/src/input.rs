//! Raw input as reported by a backend, before it is routed to interactive
//! nodes.

use crate::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
        }
    }
}

bitflags::bitflags! {
    /// Buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F12
}

impl Key {
    /// The character this key produces on its own, if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Character(c) => Some(*c),
            Key::Space => Some(' '),
            Key::Enter => Some('\n'),
            Key::Tab => Some('\t'),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Move,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub event: PointerEventKind,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WheelEvent {
    /// Positive scrolls content down/right.
    pub delta: f32,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextInputEvent {
    pub text: String,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Text(TextInputEvent),
    ModifiersChanged(Modifiers),
}

impl InputEvent {
    pub fn pointer_down(position: Vec2, button: MouseButton) -> Self {
        InputEvent::Pointer(PointerEvent {
            id: PointerId(0),
            event: PointerEventKind::Down(button),
            position,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn pointer_up(position: Vec2, button: MouseButton) -> Self {
        InputEvent::Pointer(PointerEvent {
            id: PointerId(0),
            event: PointerEventKind::Up(button),
            position,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn pointer_move(position: Vec2) -> Self {
        InputEvent::Pointer(PointerEvent {
            id: PointerId(0),
            event: PointerEventKind::Move,
            position,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn key(key: Key, state: KeyState, modifiers: Modifiers) -> Self {
        InputEvent::Key(KeyEvent {
            key,
            state,
            modifiers,
            is_repeat: false,
        })
    }
}
