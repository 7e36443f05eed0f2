use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),
    #[error("cannot attach {child:?} under {parent:?}: it is the node itself or one of its descendants")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("the display root cannot be reparented or removed")]
    Root,
    #[error("child index {index} is out of bounds for a parent with {len} children")]
    ChildIndex { index: usize, len: usize },
}
