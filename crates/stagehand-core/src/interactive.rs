//! The interactive capability a scene node may carry.
//!
//! A node with an [`InteractiveState`] has a hit area, hover/drag/focus
//! flags and a set of listeners. Whether the node actually takes part in
//! hit testing is decided by the input manager's registry; the capability
//! alone only makes a node *eligible* (and lets events bubble through it).

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::event::{InteractiveEvent, InteractiveEventKind};
use crate::Size;

pub type Listener = Rc<dyn Fn(&InteractiveEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct InteractiveFlags: u8 {
        const HOVERING = 1 << 0;
        const DRAGGING = 1 << 1;
        const FOCUSED = 1 << 2;
        /// Node takes part in Tab / Shift+Tab cycling.
        const TABBING_ENABLED = 1 << 3;
        /// Events delivered to this node are re-delivered to an interactive parent.
        const PUSH_EVENTS_UP = 1 << 4;
    }
}

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    kind: Option<InteractiveEventKind>,
    listener: Listener,
}

#[derive(Clone)]
pub struct InteractiveState {
    area: Size,
    flags: InteractiveFlags,
    listeners: SmallVec<[ListenerEntry; 2]>,
}

impl fmt::Debug for InteractiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveState")
            .field("area", &self.area)
            .field("flags", &self.flags)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl InteractiveState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            area: Size::clamped(width, height),
            flags: InteractiveFlags::TABBING_ENABLED,
            listeners: SmallVec::new(),
        }
    }

    pub fn with_push_events_up(mut self, on: bool) -> Self {
        self.flags.set(InteractiveFlags::PUSH_EVENTS_UP, on);
        self
    }

    pub fn with_tabbing_enabled(mut self, on: bool) -> Self {
        self.flags.set(InteractiveFlags::TABBING_ENABLED, on);
        self
    }

    pub fn area(&self) -> Size {
        self.area
    }

    pub fn set_area(&mut self, width: f32, height: f32) {
        self.area = Size::clamped(width, height);
    }

    pub fn flags(&self) -> InteractiveFlags {
        self.flags
    }

    /// Hover, drag and focus flags are owned by the input manager; setting
    /// them by hand desynchronises it from the registry.
    pub fn set_flag(&mut self, flag: InteractiveFlags, on: bool) {
        self.flags.set(flag, on);
    }

    pub fn is_hovering(&self) -> bool {
        self.flags.contains(InteractiveFlags::HOVERING)
    }
    pub fn is_dragging(&self) -> bool {
        self.flags.contains(InteractiveFlags::DRAGGING)
    }
    pub fn is_focused(&self) -> bool {
        self.flags.contains(InteractiveFlags::FOCUSED)
    }
    pub fn is_tabbing_enabled(&self) -> bool {
        self.flags.contains(InteractiveFlags::TABBING_ENABLED)
    }
    pub fn is_push_events_up(&self) -> bool {
        self.flags.contains(InteractiveFlags::PUSH_EVENTS_UP)
    }

    pub fn set_tabbing_enabled(&mut self, on: bool) {
        self.flags.set(InteractiveFlags::TABBING_ENABLED, on);
    }
    pub fn set_push_events_up(&mut self, on: bool) {
        self.flags.set(InteractiveFlags::PUSH_EVENTS_UP, on);
    }

    pub(crate) fn add_listener(
        &mut self,
        id: ListenerId,
        kind: Option<InteractiveEventKind>,
        listener: Listener,
    ) {
        self.listeners.push(ListenerEntry { id, kind, listener });
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|e| e.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot of listeners interested in `kind`, in registration order.
    pub fn listeners_for(&self, kind: InteractiveEventKind) -> SmallVec<[Listener; 4]> {
        self.listeners
            .iter()
            .filter(|e| e.kind.is_none_or(|k| k == kind))
            .map(|e| e.listener.clone())
            .collect()
    }
}
