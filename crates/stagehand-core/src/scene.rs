//! Arena-backed scene graph.
//!
//! Nodes live in a [`SlotMap`] and refer to each other by [`NodeId`]: a
//! node owns its children list, while the parent link is a plain id used
//! only for upward traversal. Absolute position, scale and on-screen status
//! are derived by walking that chain on every query, so detaching a subtree
//! takes effect for all of its nodes at once.

use slotmap::{SecondaryMap, SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::error::SceneError;
use crate::event::InteractiveEventKind;
use crate::interactive::{InteractiveState, Listener, ListenerId};
use crate::{Rect, Transform, Vec2};

new_key_type! {
    /// Handle into the scene arena. Stays unique after the node is destroyed.
    pub struct NodeId;
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Radians. Kept for the renderer; hit areas ignore it.
    pub rotation: f32,
    pub visible: bool,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    interactive: Option<InteractiveState>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            visible: true,
            parent: None,
            children: SmallVec::new(),
            interactive: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn scaled(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_interactive(mut self, state: InteractiveState) -> Self {
        self.interactive = Some(state);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn interactive(&self) -> Option<&InteractiveState> {
        self.interactive.as_ref()
    }

    pub fn interactive_mut(&mut self) -> Option<&mut InteractiveState> {
        self.interactive.as_mut()
    }

    pub fn set_interactive(&mut self, state: Option<InteractiveState>) {
        self.interactive = state;
    }

    pub fn local_transform(&self) -> Transform {
        Transform {
            translate_x: self.x,
            translate_y: self.y,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            rotate: self.rotation,
        }
    }
}

pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
    z_order: SecondaryMap<NodeId, i32>,
    next_listener: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("stage"));
        let mut graph = Self {
            nodes,
            root,
            z_order: SecondaryMap::new(),
            next_listener: 1,
        };
        graph.reindex();
        graph
    }

    /// The display root. Anything reachable from here is attached.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Capability query: the node's interactive view, if it has one.
    pub fn interactive(&self, id: NodeId) -> Option<&InteractiveState> {
        self.nodes.get(id).and_then(|n| n.interactive.as_ref())
    }

    pub fn interactive_mut(&mut self, id: NodeId) -> Option<&mut InteractiveState> {
        self.nodes.get_mut(id).and_then(|n| n.interactive.as_mut())
    }

    // --- structure -------------------------------------------------------

    pub(crate) fn insert(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    pub(crate) fn insert_child(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        child: NodeId,
    ) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if child == self.root {
            return Err(SceneError::Root);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(i) = index {
            let mut len = self.nodes[parent].children.len();
            if self.nodes[child].parent == Some(parent) {
                len -= 1;
            }
            if i > len {
                return Err(SceneError::ChildIndex { index: i, len });
            }
        }

        self.unlink(child);

        let siblings = &mut self.nodes[parent].children;
        match index {
            Some(i) => siblings.insert(i, child),
            None => siblings.push(child),
        }
        self.nodes[child].parent = Some(parent);
        self.reindex();
        Ok(())
    }

    pub(crate) fn detach(&mut self, id: NodeId) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id));
        }
        if id == self.root {
            return Err(SceneError::Root);
        }
        if self.unlink(id) {
            self.reindex();
        }
        Ok(())
    }

    /// Removes `id` and its whole subtree from the arena.
    pub(crate) fn destroy(&mut self, id: NodeId) -> Result<usize, SceneError> {
        self.detach(id)?;
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children.iter().copied());
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn unlink(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        true
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Paint order: pre-order depth-first from the root, children in order.
    fn reindex(&mut self) {
        self.z_order.clear();
        let mut rank = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            self.z_order.insert(id, rank);
            rank += 1;
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    pub(crate) fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    pub(crate) fn add_listener(
        &mut self,
        node: NodeId,
        kind: Option<InteractiveEventKind>,
        listener: Listener,
    ) -> Option<ListenerId> {
        if self.interactive(node).is_none() {
            return None;
        }
        let id = self.next_listener_id();
        self.interactive_mut(node)?.add_listener(id, kind, listener);
        Some(id)
    }

    // --- derived state ---------------------------------------------------

    /// Whether the parent chain reaches the display root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Attached, and the node plus every ancestor is visible.
    pub fn is_on_screen(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get(c) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            if c == self.root {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// The node's own visibility flag.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    /// Paint rank from the root; later is on top. `-1` when detached.
    pub fn absolute_z_order(&self, id: NodeId) -> i32 {
        self.z_order.get(id).copied().unwrap_or(-1)
    }

    /// Detached subtrees are resolved relative to their topmost ancestor.
    pub fn absolute_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain: SmallVec<[&SceneNode; 16]> = SmallVec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.nodes.get(c)?;
            chain.push(node);
            current = node.parent;
        }
        let mut t = Transform::identity();
        for node in chain.iter().rev() {
            t = t.then(&node.local_transform());
        }
        Some(t)
    }

    pub fn absolute_position(&self, id: NodeId) -> Option<Vec2> {
        self.absolute_transform(id).map(|t| t.position())
    }

    pub fn absolute_scale(&self, id: NodeId) -> Option<Vec2> {
        self.absolute_transform(id).map(|t| Vec2::new(t.scale_x, t.scale_y))
    }

    /// Screen-space hit rectangle of an interactive node.
    pub fn hit_rect(&self, id: NodeId) -> Option<Rect> {
        let area = self.interactive(id)?.area();
        Some(self.absolute_transform(id)?.apply_to_size(area))
    }

    /// Next node on a bubbling chain: the parent, if `id` pushes events up
    /// and the parent carries the interactive capability.
    pub fn bubble_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if !node.interactive.as_ref()?.is_push_events_up() {
            return None;
        }
        let parent = node.parent?;
        self.interactive(parent).map(|_| parent)
    }

    /// Depth-first listing of the subtree rooted at `id`, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(next) {
                out.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }
}
