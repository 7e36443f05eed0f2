//! Routes backend [`InputEvent`]s into an [`InteractiveManager`].

use stagehand_core::{InputEvent, KeyState, Modifiers, PointerEventKind, Vec2};
use stagehand_input::InteractiveManager;

pub struct InputAdapter {
    input: InteractiveManager,
    cursor: Vec2,
    modifiers: Modifiers,
}

impl InputAdapter {
    pub fn new(input: InteractiveManager) -> Self {
        Self {
            input,
            cursor: Vec2::ZERO,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn input(&self) -> &InteractiveManager {
        &self.input
    }

    /// Last pointer position seen.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Pointer(pe) => {
                self.cursor = pe.position;
                self.modifiers = pe.modifiers;
                self.input.set_modifiers(pe.modifiers);
                let (x, y) = (pe.position.x, pe.position.y);
                match pe.event {
                    PointerEventKind::Down(button) => {
                        self.input.screen_touch(x, y, pe.id, button, true)
                    }
                    PointerEventKind::Up(button) => {
                        self.input.screen_touch(x, y, pe.id, button, false)
                    }
                    PointerEventKind::Move => self.input.screen_drag(pe.id, x, y),
                }
            }
            InputEvent::Wheel(we) => {
                self.modifiers = we.modifiers;
                self.input.set_modifiers(we.modifiers);
                self.input.screen_wheel(we.delta);
            }
            InputEvent::Key(ke) => {
                self.modifiers = ke.modifiers;
                match (ke.state, ke.is_repeat) {
                    (KeyState::Pressed, false) => self.input.key_down(ke.key, ke.modifiers),
                    (KeyState::Pressed, true) => self.input.key_repeat(ke.key, ke.modifiers),
                    (KeyState::Released, _) => self.input.key_up(ke.key, ke.modifiers),
                }
            }
            InputEvent::Text(te) => self.input.key_type(&te.text, te.modifiers),
            InputEvent::ModifiersChanged(mods) => {
                self.modifiers = *mods;
                self.input.set_modifiers(*mods);
            }
        }
    }
}
