use crate::input::{Key, Modifiers, MouseButton, MouseButtons, PointerId};
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractiveEventKind {
    Down,
    Up,
    Drag,
    Hover,
    Out,
    FocusIn,
    FocusOut,
    Wheel,
    KeyDown,
    KeyUp,
    KeyRepeat,
    KeyType,
}

/// One synthesized dispatch to an interactive node.
///
/// The same value is handed to every node on a bubbling chain, so
/// `position` is always relative to the node the event originated on.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractiveEvent {
    pub kind: InteractiveEventKind,
    pub position: Vec2,
    pub on_area: bool,
    pub pointer: PointerId,
    /// Buttons held at the time of the event.
    pub buttons: MouseButtons,
    /// Button whose state changed (press/release only).
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
    pub delta: f32,
    pub key: Option<Key>,
    pub key_char: Option<char>,
    pub text: Option<String>,
    pub by_mouse_down: bool,
}

impl InteractiveEvent {
    pub fn new(kind: InteractiveEventKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            on_area: false,
            pointer: PointerId::default(),
            buttons: MouseButtons::empty(),
            button: None,
            modifiers: Modifiers::NONE,
            delta: 0.0,
            key: None,
            key_char: None,
            text: None,
            by_mouse_down: false,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }
    pub fn with_on_area(mut self, on_area: bool) -> Self {
        self.on_area = on_area;
        self
    }
    pub fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }
    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self.key_char = key.as_char();
        self
    }
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.key_char = text.chars().next();
        self.text = Some(text);
        self
    }
    pub fn with_by_mouse_down(mut self, by_mouse_down: bool) -> Self {
        self.by_mouse_down = by_mouse_down;
        self
    }
}
