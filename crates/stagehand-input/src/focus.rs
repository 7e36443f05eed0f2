//! Focus changes, Tab cycling and Tab auto-repeat.

use stagehand_core::{InteractiveEvent, InteractiveEventKind, InteractiveFlags, NodeId};

use crate::manager::InteractiveManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabDirection {
    Next,
    Previous,
}

impl InteractiveManager {
    /// Moves focus to `id`.
    ///
    /// No-op if `id` already has focus. Otherwise the previous holder gets
    /// `FocusOut` while it still holds focus; then, if `id` is registered it
    /// gets `FocusIn`, else focus is cleared. If a `FocusOut` listener moves
    /// focus itself, that choice stands and `id` is not focused.
    pub fn set_focused(&self, id: NodeId, by_mouse_down: bool) {
        let previous = {
            let st = self.state();
            if st.focused == Some(id) {
                return;
            }
            st.focused
        };

        if let Some(prev) = previous {
            self.leave_focus(prev, false);
            if self.focused() != previous {
                log::debug!("focus change to {id:?} superseded by a FocusOut listener");
                return;
            }
        }

        let index = {
            let mut st = self.state_mut();
            let index = st.registry.iter().position(|n| *n == id);
            st.focused = index.map(|_| id);
            st.focused_index = index;
            index
        };
        if index.is_none() {
            log::debug!("focus cleared ({id:?} is not registered)");
            return;
        }
        log::debug!("focus -> {id:?}");
        self.stage().set_flag(id, InteractiveFlags::FOCUSED, true);
        self.dispatch(
            id,
            &InteractiveEvent::new(InteractiveEventKind::FocusIn).with_by_mouse_down(by_mouse_down),
        );
    }

    /// Focuses the registered node at `index`, clamped to the last one.
    /// No-op on an empty registry.
    pub fn set_focused_index(&self, index: usize) {
        let target = {
            let st = self.state();
            match st.registry.len() {
                0 => None,
                len => Some(st.registry[index.min(len - 1)]),
            }
        };
        if let Some(id) = target {
            self.set_focused(id, false);
        }
    }

    /// Sends `FocusOut` then `Out` to the focused node, if any, then clears
    /// focus whatever the listeners did.
    pub fn reset_focus(&self) {
        let Some(prev) = self.focused() else {
            return;
        };
        log::debug!("focus reset (was {prev:?})");
        self.leave_focus(prev, true);

        let current = {
            let mut st = self.state_mut();
            st.focused_index = None;
            st.focused.take()
        };
        if let Some(current) = current.filter(|c| *c != prev) {
            self.stage().set_flag(current, InteractiveFlags::FOCUSED, false);
        }
    }

    /// Clears `FOCUSED` on `prev` and sends it `FocusOut` (and `Out` when
    /// `with_out`). A nested call for the node already being left skips the
    /// second `FocusOut`.
    fn leave_focus(&self, prev: NodeId, with_out: bool) {
        let outer = {
            let mut st = self.state_mut();
            let outer = st.leaving;
            st.leaving = Some(prev);
            outer
        };
        if outer != Some(prev) {
            self.stage().set_flag(prev, InteractiveFlags::FOCUSED, false);
            self.dispatch(prev, &InteractiveEvent::new(InteractiveEventKind::FocusOut));
        }
        if with_out {
            self.dispatch(prev, &InteractiveEvent::new(InteractiveEventKind::Out));
        }
        self.state_mut().leaving = outer;
    }

    pub fn focus_next(&self) {
        self.step_focus(TabDirection::Next);
    }

    pub fn focus_previous(&self) {
        self.step_focus(TabDirection::Previous);
    }

    /// Tab-enabled, on screen and visible.
    pub fn is_tab_eligible(&self, id: NodeId) -> bool {
        self.stage().with(|g| {
            g.interactive(id).is_some_and(|i| i.is_tabbing_enabled())
                && g.is_on_screen(id)
                && g.is_visible(id)
        })
    }

    pub fn eligible_count(&self) -> usize {
        let registry = self.registered();
        registry.iter().filter(|&&id| self.is_tab_eligible(id)).count()
    }

    /// One Tab step: the node losing focus gets `Out`, the next index is
    /// focused, and ineligible nodes are skipped. Bounded by the registry
    /// length.
    pub(crate) fn step_focus(&self, direction: TabDirection) {
        let len = self.len();
        if len == 0 || self.eligible_count() == 0 {
            return;
        }

        for _ in 0..len {
            let step = {
                let st = self.state();
                let len = st.registry.len();
                if len == 0 {
                    return;
                }
                let next = match (direction, st.focused_index) {
                    (TabDirection::Next, Some(i)) => (i + 1) % len,
                    (TabDirection::Next, None) => 0,
                    (TabDirection::Previous, Some(i)) if i > 0 => (i - 1).min(len - 1),
                    (TabDirection::Previous, _) => len - 1,
                };
                (next, st.focused)
            };
            let (next, previous) = step;

            if let Some(prev) = previous {
                self.dispatch(prev, &InteractiveEvent::new(InteractiveEventKind::Out));
            }
            self.set_focused_index(next);

            let focused = self.focused();
            match focused {
                Some(id) if self.is_tab_eligible(id) => {
                    log::debug!("tab {direction:?} -> {id:?}");
                    return;
                }
                Some(_) => {}
                None => return,
            }
        }
    }

    pub fn is_tabbing_enabled(&self) -> bool {
        self.state().tabbing_enabled
    }

    /// Turns Tab / Enter / Escape handling on or off. Turning it off stops
    /// any Tab auto-repeat in progress.
    pub fn set_tabbing_enabled(&self, on: bool) {
        {
            let mut st = self.state_mut();
            if st.tabbing_enabled == on {
                return;
            }
            st.tabbing_enabled = on;
        }
        if !on {
            self.cancel_tab_hold();
        }
    }

    pub fn is_tab_held(&self) -> bool {
        self.state().tab_hold.is_some()
    }

    pub(crate) fn cancel_tab_hold(&self) {
        let mut st = self.state_mut();
        st.tab_hold = None;
        st.key_hold_time = self.config().key_hold_time;
    }

    /// Per-frame hook. While Tab is held, counts down the hold time and then
    /// steps focus every `key_repeat_interval + 1` frames.
    pub fn tick(&self) {
        let fire = {
            let mut st = self.state_mut();
            let Some(direction) = st.tab_hold else {
                return;
            };
            st.key_hold_time -= 1;
            if st.key_hold_time < 0 {
                st.key_hold_time = self.config().key_repeat_interval;
                Some(direction)
            } else {
                None
            }
        };
        if let Some(direction) = fire {
            self.step_focus(direction);
        }
    }
}
