use thiserror::Error;

use crate::scene_graph::node::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),
    #[error("node {0:?} has been destroyed")]
    NodeDestroyed(NodeId),
    #[error("cannot attach {child:?} under {parent:?}: it would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}
