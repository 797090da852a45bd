use thiserror::Error;

use crate::ast::NodeId;

/// Represents a structural mutation the node arena refused to perform.
///
/// None of these can be triggered by source text; they signal a broken
/// builder invariant and are surfaced instead of corrupting the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node already has a parent and cannot be attached a second time.
    #[error("Node {node} is already attached to node {parent}.")]
    AlreadyAttached {
        /// The node that was about to be attached.
        node:   NodeId,
        /// Its current parent.
        parent: NodeId,
    },
    /// The node is not among the given parent's children.
    #[error("Node {child} is not a child of node {parent}.")]
    NotAChild {
        /// The parent that was searched.
        parent: NodeId,
        /// The node that was looked for.
        child:  NodeId,
    },
    /// Attaching the node would make it its own ancestor.
    #[error("Attaching node {node} below node {parent} would create a cycle.")]
    CreatesCycle {
        /// The node that was about to be attached.
        node:   NodeId,
        /// The would-be parent, a descendant of `node`.
        parent: NodeId,
    },
    /// The node has already been released.
    #[error("Node {node} has been released.")]
    Released {
        /// The released node.
        node: NodeId,
    },
    /// Only detached subtrees can be released.
    #[error("Node {node} is still attached and cannot be released.")]
    StillAttached {
        /// The attached node.
        node: NodeId,
    },
}
