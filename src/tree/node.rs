//! Node storage types for the topology tree arena.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle to a node inside a [`TopologyTree`](super::TopologyTree) arena.
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    pub(super) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf/branch state of a node.
///
/// A topology "leaf" is a node that carries a value and may never hold
/// children; a branch may hold children and never a value. The two are
/// mutually exclusive by construction. Note that a branch with zero
/// children is still a branch: nothing infers leafness from emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Branch(Vec<NodeId>),
    /// An empty string means the leaf has no value; the formats never
    /// distinguish an absent value from an empty one.
    Leaf(String),
}

/// A single node of the topology tree.
///
/// The `id` is the full slash-delimited path from the root and doubles as
/// the node's identity: equality and hashing consider `id` alone.
#[derive(Debug, Clone)]
pub struct TopoNode {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) level: u32,
    pub(super) parent: Option<NodeId>,
    pub(super) state: NodeState,
}

impl TopoNode {
    /// Full path id of this node (`/` for the root).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth of this node; the root is level 0.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.state, NodeState::Leaf(_))
    }

    /// Leaf value, if this node is a leaf. Branches have no value.
    pub fn value(&self) -> Option<&str> {
        match &self.state {
            NodeState::Leaf(v) => Some(v),
            NodeState::Branch(_) => None,
        }
    }

    /// Child handles in insertion order. Empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.state {
            NodeState::Branch(children) => children,
            NodeState::Leaf(_) => &[],
        }
    }
}

impl PartialEq for TopoNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TopoNode {}

impl Hash for TopoNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TopoNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
