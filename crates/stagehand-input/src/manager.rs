//! Registry of interactive nodes and pointer / key routing.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use stagehand_core::{
    DetachObserverId, InteractiveEvent, InteractiveEventKind, InteractiveFlags, Key, Modifiers,
    MouseButton, MouseButtons, NodeId, PointerId, Stage, Vec2,
};

use crate::config::InteractiveConfig;
use crate::dispatch::dispatch;
use crate::focus::TabDirection;
use crate::hit_test::{self, HitCandidate};

pub(crate) struct ManagerState {
    /// Registration order. Scans clone the `Rc` and iterate the snapshot;
    /// writers go through `Rc::make_mut`.
    pub(crate) registry: Rc<Vec<NodeId>>,
    pub(crate) focused: Option<NodeId>,
    pub(crate) focused_index: Option<usize>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) buttons: MouseButtons,
    pub(crate) modifiers: Modifiers,
    pub(crate) tabbing_enabled: bool,
    pub(crate) tab_hold: Option<TabDirection>,
    pub(crate) key_hold_time: i32,
    /// Node currently being sent `FocusOut`.
    pub(crate) leaving: Option<NodeId>,
}

pub(crate) struct Inner {
    pub(crate) stage: Stage,
    pub(crate) config: InteractiveConfig,
    pub(crate) state: RefCell<ManagerState>,
    detach_observer: Cell<Option<DetachObserverId>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(id) = self.detach_observer.take() {
            self.stage.remove_detach_observer(id);
        }
    }
}

/// Decides which registered node a pointer or key event targets and keeps
/// hover, drag and focus state in step with the scene.
///
/// Cheap to clone; clones share the same registry. Listeners may call back
/// into the manager (register, unregister, change focus) while an event is
/// being delivered.
#[derive(Clone)]
pub struct InteractiveManager {
    pub(crate) inner: Rc<Inner>,
}

impl fmt::Debug for InteractiveManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state();
        f.debug_struct("InteractiveManager")
            .field("registered", &st.registry.len())
            .field("focused", &st.focused)
            .field("hovered", &st.hovered)
            .field("tabbing_enabled", &st.tabbing_enabled)
            .finish()
    }
}

impl InteractiveManager {
    pub fn new(stage: &Stage, config: InteractiveConfig) -> Self {
        let inner = Rc::new(Inner {
            stage: stage.clone(),
            config,
            state: RefCell::new(ManagerState {
                registry: Rc::new(Vec::new()),
                focused: None,
                focused_index: None,
                hovered: None,
                buttons: MouseButtons::empty(),
                modifiers: Modifiers::NONE,
                tabbing_enabled: config.tabbing_enabled,
                tab_hold: None,
                key_hold_time: config.key_hold_time,
                leaving: None,
            }),
            detach_observer: Cell::new(None),
        });

        let weak: Weak<Inner> = Rc::downgrade(&inner);
        let observer = stage.on_detach(move |id| {
            if let Some(inner) = weak.upgrade() {
                InteractiveManager { inner }.handle_detached(id);
            }
        });
        inner.detach_observer.set(Some(observer));

        Self { inner }
    }

    pub fn stage(&self) -> &Stage {
        &self.inner.stage
    }

    pub fn config(&self) -> &InteractiveConfig {
        &self.inner.config
    }

    pub(crate) fn state(&self) -> Ref<'_, ManagerState> {
        self.inner.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, ManagerState> {
        self.inner.state.borrow_mut()
    }

    // --- registry --------------------------------------------------------

    /// Adds a node carrying the interactive capability. Registering twice is
    /// a no-op; nodes without the capability are ignored.
    pub fn register(&self, id: NodeId) {
        if self.stage().with(|g| g.interactive(id).is_none()) {
            log::warn!("register: {id:?} has no interactive capability, ignoring");
            return;
        }
        let mut st = self.state_mut();
        if st.registry.contains(&id) {
            return;
        }
        Rc::make_mut(&mut st.registry).push(id);
        log::debug!("registered {id:?} ({} total)", st.registry.len());
    }

    /// Removes a node from the registry. If it held focus, focus is reset
    /// (`FocusOut` then `Out`). Hover and drag state are dropped silently.
    pub fn unregister(&self, id: NodeId) {
        let was_focused = {
            let mut st = self.state_mut();
            let Some(pos) = st.registry.iter().position(|n| *n == id) else {
                return;
            };
            Rc::make_mut(&mut st.registry).remove(pos);
            if st.hovered == Some(id) {
                st.hovered = None;
            }
            let was_focused = st.focused == Some(id);
            let index = st.focused.and_then(|f| st.registry.iter().position(|n| *n == f));
            st.focused_index = index;
            was_focused
        };
        log::debug!("unregistered {id:?}");

        if was_focused {
            self.reset_focus();
        }
        self.stage().with_mut(|g| {
            if let Some(state) = g.interactive_mut(id) {
                state.set_flag(InteractiveFlags::HOVERING | InteractiveFlags::DRAGGING, false);
            }
        });
    }

    /// Empties the registry, drops hover and drag state of the removed
    /// nodes, then resets focus.
    pub fn clear(&self) {
        let removed = {
            let mut st = self.state_mut();
            st.hovered = None;
            std::mem::take(Rc::make_mut(&mut st.registry))
        };
        self.stage().with_mut(|g| {
            for &id in &removed {
                if let Some(state) = g.interactive_mut(id) {
                    state.set_flag(InteractiveFlags::HOVERING | InteractiveFlags::DRAGGING, false);
                }
            }
        });
        log::debug!("registry cleared ({} nodes)", removed.len());
        self.reset_focus();
    }

    /// Snapshot of the registry in registration order.
    pub fn registered(&self) -> Rc<Vec<NodeId>> {
        self.state().registry.clone()
    }

    pub fn len(&self) -> usize {
        self.state().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().registry.is_empty()
    }

    pub fn is_registered(&self, id: NodeId) -> bool {
        self.state().registry.contains(&id)
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.state().focused
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.state().focused_index
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.state().hovered
    }

    pub fn buttons(&self) -> MouseButtons {
        self.state().buttons
    }

    pub fn modifiers(&self) -> Modifiers {
        self.state().modifiers
    }

    pub fn set_modifiers(&self, modifiers: Modifiers) {
        self.state_mut().modifiers = modifiers;
    }

    /// Delivers `event` to `target` and up its bubbling chain.
    pub fn dispatch(&self, target: NodeId, event: &InteractiveEvent) -> usize {
        dispatch(self.stage(), target, event)
    }

    fn pointer_snapshot(&self) -> (Rc<Vec<NodeId>>, MouseButtons, Modifiers) {
        let st = self.state();
        (st.registry.clone(), st.buttons, st.modifiers)
    }

    fn candidate(&self, id: NodeId) -> Option<HitCandidate> {
        self.stage().with(|g| hit_test::candidate(g, id))
    }

    // --- pointer ---------------------------------------------------------

    /// Press or release of `button` at screen position `(x, y)`.
    ///
    /// A press focuses the topmost hit node, sends it `Down` and marks it
    /// dragging; a press that hits nothing leaves focus alone. A release
    /// sends `Up` to every on-screen node that is dragging, wherever the
    /// pointer is.
    pub fn screen_touch(&self, x: f32, y: f32, pointer: PointerId, button: MouseButton, down: bool) {
        let point = Vec2::new(x, y);
        let buttons = {
            let mut st = self.state_mut();
            st.buttons.set(button.flag(), down);
            st.buttons
        };
        let (registry, _, modifiers) = self.pointer_snapshot();

        if down {
            let hit = self.stage().with(|g| hit_test::resolve(g, &registry, point));
            let Some(hit) = hit else {
                log::trace!("press at {point:?} hit nothing");
                return;
            };
            self.set_focused(hit.node, true);
            let event = InteractiveEvent::new(InteractiveEventKind::Down)
                .with_position(hit.local(point))
                .with_on_area(true)
                .with_pointer(pointer)
                .with_buttons(buttons)
                .with_button(button)
                .with_modifiers(modifiers);
            self.dispatch(hit.node, &event);
            self.stage().set_flag(hit.node, InteractiveFlags::DRAGGING, true);
        } else {
            for &id in registry.iter() {
                let Some(c) = self.candidate(id) else {
                    continue;
                };
                if !c.on_screen || !c.flags.contains(InteractiveFlags::DRAGGING) {
                    continue;
                }
                let event = InteractiveEvent::new(InteractiveEventKind::Up)
                    .with_position(c.local(point))
                    .with_on_area(c.contains(point))
                    .with_pointer(pointer)
                    .with_buttons(buttons)
                    .with_button(button)
                    .with_modifiers(modifiers);
                self.dispatch(id, &event);
                self.stage().set_flag(id, InteractiveFlags::DRAGGING, false);
            }
        }
    }

    /// Pointer motion to `(x, y)`.
    ///
    /// Dragging nodes receive `Drag` wherever the pointer is. Hovering nodes
    /// the pointer has left receive `Out` once. The topmost node under the
    /// pointer becomes the hovered node and receives `Hover`, unless it is
    /// already hovering.
    pub fn screen_drag(&self, pointer: PointerId, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        let (registry, buttons, modifiers) = self.pointer_snapshot();
        let base = |kind: InteractiveEventKind, c: &HitCandidate, on_area: bool| {
            InteractiveEvent::new(kind)
                .with_position(c.local(point))
                .with_on_area(on_area)
                .with_pointer(pointer)
                .with_buttons(buttons)
                .with_modifiers(modifiers)
        };

        let mut under: SmallVec<[HitCandidate; 8]> = SmallVec::new();
        for &id in registry.iter() {
            let Some(c) = self.candidate(id) else {
                continue;
            };
            if !c.on_screen {
                continue;
            }
            let on_area = c.contains(point);
            if on_area {
                under.push(c);
            }
            if c.flags.contains(InteractiveFlags::DRAGGING) {
                self.dispatch(id, &base(InteractiveEventKind::Drag, &c, on_area));
            }
            // Re-read: the Drag listener may have changed it.
            if !on_area && self.stage().has_flag(id, InteractiveFlags::HOVERING) {
                self.stage().set_flag(id, InteractiveFlags::HOVERING, false);
                {
                    let mut st = self.state_mut();
                    if st.hovered == Some(id) {
                        st.hovered = None;
                    }
                }
                self.dispatch(id, &base(InteractiveEventKind::Out, &c, false));
            }
        }

        let Some(top) = hit_test::topmost(&under, point).copied() else {
            return;
        };
        if !self.is_registered(top.node)
            || self.stage().has_flag(top.node, InteractiveFlags::HOVERING)
        {
            return;
        }

        let previous = self.hovered().filter(|&p| p != top.node);
        if let Some(prev) = previous {
            if self.stage().has_flag(prev, InteractiveFlags::HOVERING) {
                self.stage().set_flag(prev, InteractiveFlags::HOVERING, false);
                let event = match self.candidate(prev) {
                    Some(c) => base(InteractiveEventKind::Out, &c, false),
                    None => base(InteractiveEventKind::Out, &top, false),
                };
                self.dispatch(prev, &event);
            }
        }

        self.state_mut().hovered = Some(top.node);
        self.stage().set_flag(top.node, InteractiveFlags::HOVERING, true);
        log::trace!("hover -> {:?}", top.node);
        self.dispatch(top.node, &base(InteractiveEventKind::Hover, &top, true));
    }

    /// Wheel goes to the hovered node while it is on screen and hovering,
    /// otherwise to the focused node.
    pub fn screen_wheel(&self, delta: f32) {
        let (hovered, focused, buttons, modifiers) = {
            let st = self.state();
            (st.hovered, st.focused, st.buttons, st.modifiers)
        };
        let hovered = hovered.filter(|&h| {
            self.stage().is_on_screen(h) && self.stage().has_flag(h, InteractiveFlags::HOVERING)
        });
        let Some(target) = hovered.or(focused) else {
            return;
        };
        let event = InteractiveEvent::new(InteractiveEventKind::Wheel)
            .with_delta(delta)
            .with_buttons(buttons)
            .with_modifiers(modifiers);
        self.dispatch(target, &event);
    }

    // --- keyboard --------------------------------------------------------

    fn dispatch_to_focused(&self, event: InteractiveEvent) {
        let focused = self.focused();
        if let Some(id) = focused {
            self.dispatch(id, &event);
        }
    }

    /// The focused node receives `KeyDown` first; then, while tabbing is
    /// enabled, Tab steps focus and starts auto-repeat, Enter sends `Down`
    /// to the focused node and Escape resets focus.
    pub fn key_down(&self, key: Key, modifiers: Modifiers) {
        self.set_modifiers(modifiers);
        self.dispatch_to_focused(
            InteractiveEvent::new(InteractiveEventKind::KeyDown)
                .with_key(key)
                .with_modifiers(modifiers),
        );

        if !self.is_tabbing_enabled() {
            return;
        }
        match key {
            Key::Tab => {
                let direction = if modifiers.shift {
                    TabDirection::Previous
                } else {
                    TabDirection::Next
                };
                self.step_focus(direction);
                self.state_mut().tab_hold = Some(direction);
            }
            Key::Enter => self.dispatch_to_focused(
                InteractiveEvent::new(InteractiveEventKind::Down)
                    .with_on_area(true)
                    .with_modifiers(modifiers),
            ),
            Key::Escape => self.reset_focus(),
            _ => {}
        }
    }

    /// `KeyUp` to the focused node; releasing Tab stops auto-repeat and
    /// releasing Enter sends `Up`.
    pub fn key_up(&self, key: Key, modifiers: Modifiers) {
        self.set_modifiers(modifiers);
        self.dispatch_to_focused(
            InteractiveEvent::new(InteractiveEventKind::KeyUp)
                .with_key(key)
                .with_modifiers(modifiers),
        );

        if !self.is_tabbing_enabled() {
            return;
        }
        match key {
            Key::Tab => self.cancel_tab_hold(),
            Key::Enter => self.dispatch_to_focused(
                InteractiveEvent::new(InteractiveEventKind::Up)
                    .with_on_area(true)
                    .with_modifiers(modifiers),
            ),
            _ => {}
        }
    }

    pub fn key_repeat(&self, key: Key, modifiers: Modifiers) {
        self.set_modifiers(modifiers);
        self.dispatch_to_focused(
            InteractiveEvent::new(InteractiveEventKind::KeyRepeat)
                .with_key(key)
                .with_modifiers(modifiers),
        );
    }

    /// Committed text for the focused node.
    pub fn key_type(&self, text: &str, modifiers: Modifiers) {
        if text.is_empty() {
            return;
        }
        self.dispatch_to_focused(
            InteractiveEvent::new(InteractiveEventKind::KeyType)
                .with_text(text)
                .with_modifiers(modifiers),
        );
    }

    // --- scene changes ---------------------------------------------------

    /// `id` and its subtree just stopped being reachable from the stage root.
    fn handle_detached(&self, id: NodeId) {
        let (focused, hovered) = {
            let mut st = self.state_mut();
            let stage = &self.inner.stage;
            if st.registry.iter().any(|n| !stage.contains(*n)) {
                Rc::make_mut(&mut st.registry).retain(|n| stage.contains(*n));
                let index = st.focused.and_then(|f| st.registry.iter().position(|n| *n == f));
                st.focused_index = index;
            }
            (st.focused, st.hovered)
        };

        if let Some(h) = hovered.filter(|&h| !self.stage().is_attached(h)) {
            log::debug!("hovered {h:?} left the stage with {id:?}");
            self.state_mut().hovered = None;
            self.stage().set_flag(h, InteractiveFlags::HOVERING, false);
        }
        if let Some(f) = focused.filter(|&f| !self.stage().is_attached(f)) {
            log::debug!("focused {f:?} left the stage with {id:?}");
            self.reset_focus();
        }
    }
}
