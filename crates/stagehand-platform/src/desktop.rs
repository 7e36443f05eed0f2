//! Desktop backend via winit: window-event translation and a runner.

use smallvec::SmallVec;
use stagehand_core::{
    InputEvent, Key, KeyEvent, KeyState, Modifiers, MouseButton, PointerEvent, PointerEventKind,
    PointerId, Stage, TextInputEvent, Vec2, WheelEvent,
};
use stagehand_input::InteractiveManager;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::adapter::InputAdapter;
use crate::config::PlatformConfig;
use crate::driver::FrameDriver;
use crate::timer::Timers;

/// Pixels per wheel "line" when the OS reports pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

pub fn map_key(key: &WinitKey) -> Option<Key> {
    let key = match key {
        WinitKey::Named(named) => match named {
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Escape => Key::Escape,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Space => Key::Space,
            NamedKey::F1 => Key::F(1),
            NamedKey::F2 => Key::F(2),
            NamedKey::F3 => Key::F(3),
            NamedKey::F4 => Key::F(4),
            NamedKey::F5 => Key::F(5),
            NamedKey::F6 => Key::F(6),
            NamedKey::F7 => Key::F(7),
            NamedKey::F8 => Key::F(8),
            NamedKey::F9 => Key::F(9),
            NamedKey::F10 => Key::F(10),
            NamedKey::F11 => Key::F(11),
            NamedKey::F12 => Key::F(12),
            _ => return None,
        },
        WinitKey::Character(s) => Key::Character(s.chars().next()?),
        _ => return None,
    };
    Some(key)
}

pub fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Turns winit window events into [`InputEvent`]s, tracking the cursor
/// position and modifier state winit reports separately.
#[derive(Default)]
pub struct WinitTranslator {
    cursor: Vec2,
    modifiers: Modifiers,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn pointer(&self, event: PointerEventKind) -> InputEvent {
        InputEvent::Pointer(PointerEvent {
            id: PointerId(0),
            event,
            position: self.cursor,
            modifiers: self.modifiers,
        })
    }

    pub fn translate(&mut self, event: &WindowEvent) -> SmallVec<[InputEvent; 2]> {
        let mut out = SmallVec::new();
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                out.push(self.pointer(PointerEventKind::Move));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = map_button(*button) {
                    let kind = match state {
                        ElementState::Pressed => PointerEventKind::Down(button),
                        ElementState::Released => PointerEventKind::Up(button),
                    };
                    out.push(self.pointer(kind));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(p) => -(p.y as f32) / PIXELS_PER_LINE,
                };
                out.push(InputEvent::Wheel(WheelEvent {
                    delta,
                    modifiers: self.modifiers,
                }));
            }
            WindowEvent::ModifiersChanged(new_mods) => {
                let state = new_mods.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
                out.push(InputEvent::ModifiersChanged(self.modifiers));
            }
            WindowEvent::KeyboardInput { event: ke, .. } => {
                let pressed = ke.state == ElementState::Pressed;
                if let Some(key) = map_key(&ke.logical_key) {
                    out.push(InputEvent::Key(KeyEvent {
                        key,
                        state: if pressed {
                            KeyState::Pressed
                        } else {
                            KeyState::Released
                        },
                        modifiers: self.modifiers,
                        is_repeat: ke.repeat,
                    }));
                }
                if let Some(text) = ke.text.as_ref().filter(|_| pressed) {
                    if text.chars().any(|c| !c.is_control()) {
                        out.push(InputEvent::Text(TextInputEvent {
                            text: text.to_string(),
                            modifiers: self.modifiers,
                        }));
                    }
                }
            }
            _ => {}
        }
        out
    }
}

/// Handles passed to the `setup` closure of [`run_desktop`].
pub struct DesktopContext {
    pub stage: Stage,
    pub input: InteractiveManager,
    pub timers: Timers,
}

/// Opens a window and feeds its input into a fresh stage until the window
/// is closed. `setup` builds the scene and registers interactive nodes.
pub fn run_desktop(
    title: &str,
    config: PlatformConfig,
    setup: impl FnOnce(&DesktopContext),
) -> anyhow::Result<()> {
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowAttributes, WindowId};

    struct App {
        title: String,
        window: Option<Window>,
        translator: WinitTranslator,
        adapter: InputAdapter,
        driver: FrameDriver,
        next_frame: web_time::Instant,
    }

    impl ApplicationHandler<()> for App {
        fn resumed(&mut self, el: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            match el.create_window(
                WindowAttributes::default()
                    .with_title(self.title.clone())
                    .with_inner_size(LogicalSize::new(1280, 800)),
            ) {
                Ok(win) => self.window = Some(win),
                Err(e) => {
                    log::error!("Failed to create window: {e:?}");
                    el.exit();
                }
            }
        }

        fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            if let WindowEvent::CloseRequested = event {
                log::info!("Window close requested");
                el.exit();
                return;
            }
            for e in self.translator.translate(&event) {
                self.adapter.handle(&e);
            }
        }

        fn about_to_wait(&mut self, el: &ActiveEventLoop) {
            let now = web_time::Instant::now();
            if now >= self.next_frame {
                self.driver.frame_at(now);
                self.next_frame = now + self.driver.pacing();
            }
            el.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        }
    }

    let stage = Stage::new();
    let input = InteractiveManager::new(&stage, config.interactive);
    let timers = Timers::new();
    setup(&DesktopContext {
        stage,
        input: input.clone(),
        timers: timers.clone(),
    });

    let event_loop = EventLoop::new()?;
    let mut app = App {
        title: title.to_string(),
        window: None,
        translator: WinitTranslator::new(),
        adapter: InputAdapter::new(input.clone()),
        driver: FrameDriver::new(input, timers, config),
        next_frame: web_time::Instant::now(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_character_keys() {
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Tab)), Some(Key::Tab));
        assert_eq!(map_key(&WinitKey::Named(NamedKey::F5)), Some(Key::F(5)));
        assert_eq!(
            map_key(&WinitKey::Character("q".into())),
            Some(Key::Character('q'))
        );
        assert_eq!(map_key(&WinitKey::Named(NamedKey::CapsLock)), None);
    }

    #[test]
    fn test_buttons() {
        assert_eq!(
            map_button(winit::event::MouseButton::Middle),
            Some(MouseButton::Middle)
        );
        assert_eq!(map_button(winit::event::MouseButton::Back), None);
    }
}
