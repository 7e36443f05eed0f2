//! Shared handle over the scene graph.
//!
//! Listeners run while the input manager is walking its registry, and they
//! are allowed to restructure the scene they are running in. `Stage` makes
//! that possible by keeping the graph behind `Rc<RefCell<..>>` and never
//! holding a borrow while user code runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::SceneError;
use crate::event::InteractiveEventKind;
use crate::interactive::{InteractiveFlags, InteractiveState, ListenerId};
use crate::scene::{NodeId, SceneGraph, SceneNode};
use crate::{InteractiveEvent, Vec2};

pub type DetachObserver = Rc<dyn Fn(NodeId)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DetachObserverId(u64);

#[derive(Default)]
struct Observers {
    next_id: u64,
    list: Vec<(DetachObserverId, DetachObserver)>,
}

#[derive(Clone, Default)]
pub struct Stage {
    graph: Rc<RefCell<SceneGraph>>,
    observers: Rc<RefCell<Observers>>,
}

/// Non-owning counterpart of [`Stage`], for closures stored inside the stage.
#[derive(Clone)]
pub struct WeakStage {
    graph: Weak<RefCell<SceneGraph>>,
    observers: Weak<RefCell<Observers>>,
}

impl WeakStage {
    pub fn upgrade(&self) -> Option<Stage> {
        Some(Stage {
            graph: self.graph.upgrade()?,
            observers: self.observers.upgrade()?,
        })
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakStage {
        WeakStage {
            graph: Rc::downgrade(&self.graph),
            observers: Rc::downgrade(&self.observers),
        }
    }

    /// Read access. Do not call back into the stage or the input manager
    /// from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&SceneGraph) -> R) -> R {
        f(&*self.graph.borrow())
    }

    /// Write access for node properties (position, visibility, flags).
    /// Structural edits go through the `Stage` methods so detach observers
    /// are notified.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut SceneGraph) -> R) -> R {
        f(&mut *self.graph.borrow_mut())
    }

    pub fn root(&self) -> NodeId {
        self.with(|g| g.root())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.with(|g| g.contains(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.with(|g| g.parent(id))
    }

    pub fn name(&self, id: NodeId) -> Option<String> {
        self.with(|g| g.get(id).map(|n| n.name.clone()))
    }

    // --- structure -------------------------------------------------------

    /// Adds a detached node to the arena.
    pub fn create(&self, node: SceneNode) -> NodeId {
        self.with_mut(|g| g.insert(node))
    }

    /// Shorthand for a node with an interactive area of `width × height`.
    pub fn create_interactive(&self, name: &str, width: f32, height: f32) -> NodeId {
        self.create(SceneNode::new(name).with_interactive(InteractiveState::new(width, height)))
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.restructure(child, |g| g.insert_child(parent, None, child))
    }

    pub fn insert_child(
        &self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), SceneError> {
        self.restructure(child, |g| g.insert_child(parent, Some(index), child))
    }

    pub fn remove_from_parent(&self, id: NodeId) -> Result<(), SceneError> {
        self.restructure(id, |g| g.detach(id))
    }

    /// Removes the node and its subtree from the arena. Returns the number of
    /// nodes removed.
    pub fn destroy(&self, id: NodeId) -> Result<usize, SceneError> {
        self.restructure(id, |g| g.destroy(id))
    }

    fn restructure<R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut SceneGraph) -> Result<R, SceneError>,
    ) -> Result<R, SceneError> {
        let (result, left_stage) = {
            let mut g = self.graph.borrow_mut();
            let was_attached = g.is_attached(id);
            let result = f(&mut *g)?;
            (result, (was_attached && !g.is_attached(id)) || !g.contains(id))
        };
        if left_stage {
            log::debug!("node {id:?} left the stage");
            self.notify_detached(id);
        }
        Ok(result)
    }

    // --- properties ------------------------------------------------------

    pub fn set_position(&self, id: NodeId, x: f32, y: f32) {
        self.with_mut(|g| {
            if let Some(n) = g.get_mut(id) {
                n.x = x;
                n.y = y;
            }
        });
    }

    pub fn set_scale(&self, id: NodeId, scale_x: f32, scale_y: f32) {
        self.with_mut(|g| {
            if let Some(n) = g.get_mut(id) {
                n.scale_x = scale_x;
                n.scale_y = scale_y;
            }
        });
    }

    pub fn set_visible(&self, id: NodeId, visible: bool) {
        self.with_mut(|g| {
            if let Some(n) = g.get_mut(id) {
                n.visible = visible;
            }
        });
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.with(|g| g.get(id).map(|n| Vec2::new(n.x, n.y)))
    }

    pub fn absolute_position(&self, id: NodeId) -> Option<Vec2> {
        self.with(|g| g.absolute_position(id))
    }

    pub fn is_on_screen(&self, id: NodeId) -> bool {
        self.with(|g| g.is_on_screen(id))
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.with(|g| g.is_attached(id))
    }

    pub fn interactive_flags(&self, id: NodeId) -> Option<InteractiveFlags> {
        self.with(|g| g.interactive(id).map(|i| i.flags()))
    }

    pub fn has_flag(&self, id: NodeId, flag: InteractiveFlags) -> bool {
        self.interactive_flags(id).is_some_and(|f| f.contains(flag))
    }

    pub fn set_flag(&self, id: NodeId, flag: InteractiveFlags, on: bool) {
        self.with_mut(|g| {
            if let Some(i) = g.interactive_mut(id) {
                i.set_flag(flag, on);
            }
        });
    }

    // --- listeners -------------------------------------------------------

    /// Subscribes to one event kind. `None` if the node is not interactive.
    pub fn on(
        &self,
        id: NodeId,
        kind: InteractiveEventKind,
        listener: impl Fn(&InteractiveEvent) + 'static,
    ) -> Option<ListenerId> {
        self.with_mut(|g| g.add_listener(id, Some(kind), Rc::new(listener)))
    }

    /// Subscribes to every event kind.
    pub fn on_any(
        &self,
        id: NodeId,
        listener: impl Fn(&InteractiveEvent) + 'static,
    ) -> Option<ListenerId> {
        self.with_mut(|g| g.add_listener(id, None, Rc::new(listener)))
    }

    pub fn remove_listener(&self, id: NodeId, listener: ListenerId) -> bool {
        self.with_mut(|g| {
            g.interactive_mut(id)
                .is_some_and(|i| i.remove_listener(listener))
        })
    }

    // --- detach observers ------------------------------------------------

    /// `f` runs after a node (and with it, its subtree) stops being
    /// reachable from the root, or is destroyed. It receives the node that
    /// was cut off.
    pub fn on_detach(&self, f: impl Fn(NodeId) + 'static) -> DetachObserverId {
        let mut obs = self.observers.borrow_mut();
        obs.next_id += 1;
        let id = DetachObserverId(obs.next_id);
        obs.list.push((id, Rc::new(f)));
        id
    }

    pub fn remove_detach_observer(&self, id: DetachObserverId) {
        self.observers.borrow_mut().list.retain(|(o, _)| *o != id);
    }

    fn notify_detached(&self, id: NodeId) {
        let observers: SmallVec<[DetachObserver; 2]> = self
            .observers
            .borrow()
            .list
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for f in observers {
            f(id);
        }
    }
}
