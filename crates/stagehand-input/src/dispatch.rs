//! Delivery of one event along a bubbling chain.

use stagehand_core::{InteractiveEvent, NodeId, Stage};

/// Delivers `event` to `target`, then to each ancestor reached through
/// [`SceneGraph::bubble_parent`](stagehand_core::SceneGraph::bubble_parent).
///
/// Every node on the chain receives the same value. Listeners are re-read
/// at each hop and no graph borrow is held while they run, so a listener
/// may detach, destroy or re-parent nodes; the chain simply ends where the
/// next link no longer exists.
///
/// Returns the number of nodes the event reached.
pub fn dispatch(stage: &Stage, target: NodeId, event: &InteractiveEvent) -> usize {
    let limit = stage.with(|g| g.len());
    let mut reached = 0;
    let mut current = Some(target);

    while let Some(id) = current {
        if reached >= limit {
            log::warn!("bubbling of {:?} from {target:?} exceeded the scene size", event.kind);
            break;
        }
        let listeners = stage.with(|g| g.interactive(id).map(|i| i.listeners_for(event.kind)));
        let Some(listeners) = listeners else {
            break;
        };
        log::trace!("{:?} -> {id:?} ({} listeners)", event.kind, listeners.len());
        for listener in listeners {
            listener(event);
        }
        reached += 1;
        current = stage.with(|g| g.bubble_parent(id));
    }
    reached
}
