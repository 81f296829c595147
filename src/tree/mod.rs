//! The topology tree: an arena of named nodes addressed by [`NodeId`].
//!
//! Each node's `id` is its full slash-delimited path from the root, so the
//! id encodes the node's position. Parent links are non-owning back
//! references used for traversal only; children are owned by their parent
//! entry in insertion order. Detaching a child from its parent destroys
//! the subtree as far as callers are concerned (the arena slots simply
//! become unreachable).

mod node;

pub use node::{NodeId, NodeState, TopoNode};

use crate::error::{Result, TopologyError};

/// Separator between path segments in node ids.
pub const ID_DELIMITER: &str = "/";

/// Separator between name and value when rendering a leaf label.
pub const NAME_VALUE_DELIMITER: &str = " >> ";

/// Arena-backed topology tree with a fixed root.
#[derive(Debug, Clone)]
pub struct TopologyTree {
    nodes: Vec<TopoNode>,
}

impl TopologyTree {
    /// Create a tree holding only a root node: id `/`, level 0, branch.
    pub fn new(root_name: &str) -> Self {
        TopologyTree {
            nodes: vec![TopoNode {
                id: ID_DELIMITER.to_string(),
                name: root_name.to_string(),
                level: 0,
                parent: None,
                state: NodeState::Branch(Vec::new()),
            }],
        }
    }

    /// Handle of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node data behind a handle. Panics on a handle from another tree.
    pub fn node(&self, id: NodeId) -> &TopoNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&TopoNode> {
        self.nodes.get(id.index())
    }

    /// Allocate a branch node under `parent` without attaching it.
    ///
    /// The id and level are derived from the parent; the node joins the
    /// tree structure only once [`add_child`](Self::add_child) is called.
    pub fn new_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.derive_id(parent, name);
        let level = self.node(parent).level + 1;
        self.alloc(TopoNode {
            id,
            name: name.to_string(),
            level,
            parent: None,
            state: NodeState::Branch(Vec::new()),
        })
    }

    /// Allocate an unattached leaf node under `parent` with `value`.
    pub fn new_leaf(&mut self, parent: NodeId, name: &str, value: &str) -> NodeId {
        let id = self.derive_id(parent, name);
        let level = self.node(parent).level + 1;
        self.alloc(TopoNode {
            id,
            name: name.to_string(),
            level,
            parent: None,
            state: NodeState::Leaf(value.to_string()),
        })
    }

    /// Allocate a branch node with an explicit id and no parent wiring.
    pub fn new_detached(&mut self, id: &str, name: &str) -> NodeId {
        self.alloc(TopoNode {
            id: id.to_string(),
            name: name.to_string(),
            level: 0,
            parent: None,
            state: NodeState::Branch(Vec::new()),
        })
    }

    /// Allocate a leaf node with an explicit id and no parent wiring.
    pub fn new_detached_leaf(&mut self, id: &str, name: &str, value: &str) -> NodeId {
        self.alloc(TopoNode {
            id: id.to_string(),
            name: name.to_string(),
            level: 0,
            parent: None,
            state: NodeState::Leaf(value.to_string()),
        })
    }

    /// Attach `child` to `parent`, setting the child's level and parent
    /// link. The child's id is left as constructed.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.node(parent).is_leaf() {
            return Err(TopologyError::InvalidOperation(
                "cannot add a child to a leaf node".to_string(),
            ));
        }

        let parent_level = self.node(parent).level;
        {
            let entry = &mut self.nodes[child.index()];
            entry.level = parent_level + 1;
            entry.parent = Some(parent);
        }
        if let NodeState::Branch(children) = &mut self.nodes[parent.index()].state {
            children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. A no-op when the child is not in the
    /// parent's children sequence.
    pub fn delete_child(&mut self, parent: NodeId, child: NodeId) {
        if let NodeState::Branch(children) = &mut self.nodes[parent.index()].state {
            children.retain(|&c| c != child);
        }
    }

    /// Rename a node, recomputing its id and the id of every descendant.
    ///
    /// Descendant ids embed ancestor names, so the whole subtree is
    /// rewritten in one pre-order walk; O(subtree size), acceptable for
    /// rare interactive renames. A parentless node keeps its current id
    /// (the root id is pinned to `/`).
    pub fn set_name(&mut self, node: NodeId, name: &str) {
        if self.node(node).name == name {
            return;
        }
        self.nodes[node.index()].name = name.to_string();

        if let Some(parent) = self.node(node).parent {
            let id = self.derive_id(parent, name);
            self.nodes[node.index()].id = id;
        }

        let mut stack: Vec<NodeId> = self.node(node).children().to_vec();
        while let Some(current) = stack.pop() {
            if let Some(parent) = self.node(current).parent {
                let name = self.node(current).name.clone();
                self.nodes[current.index()].id = self.derive_id(parent, &name);
            }
            stack.extend_from_slice(self.node(current).children());
        }
    }

    /// Give a node a value, turning it into a leaf.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        if !self.node(node).children().is_empty() {
            return Err(TopologyError::InvalidOperation(
                "cannot set a value on a node that holds children".to_string(),
            ));
        }
        self.nodes[node.index()].state = NodeState::Leaf(value.to_string());
        Ok(())
    }

    /// Flip the leaf state. Turning a node with children into a leaf
    /// fails; turning a leaf back into a branch clears its value.
    pub fn set_leaf(&mut self, node: NodeId, leaf: bool) -> Result<()> {
        if leaf {
            if !self.node(node).children().is_empty() {
                return Err(TopologyError::InvalidOperation(
                    "cannot mark a node with children as a leaf".to_string(),
                ));
            }
            if !self.node(node).is_leaf() {
                self.nodes[node.index()].state = NodeState::Leaf(String::new());
            }
        } else if self.node(node).is_leaf() {
            self.nodes[node.index()].state = NodeState::Branch(Vec::new());
        }
        Ok(())
    }

    /// Walk parent links up to the parentless node.
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        self.node(node).parent.is_none()
    }

    /// Find a direct child of `parent` by case-insensitive name. One level
    /// only; blank names match nothing.
    pub fn find_child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        if name.trim().is_empty() {
            return None;
        }
        let parent = self.get(parent)?;
        parent
            .children()
            .iter()
            .copied()
            .find(|&child| self.node(child).name.eq_ignore_ascii_case(name))
    }

    /// Resolve the node a parsing cursor must re-parent to when the input
    /// level drops to `level`.
    ///
    /// Returns the *parent of* the ancestor at the requested level: when a
    /// line repeats or reduces the current depth, the new node becomes a
    /// sibling of that ancestor, so the caller needs its parent.
    pub fn ancestor_at_level(&self, node: NodeId, level: u32) -> Result<NodeId> {
        let entry = self.get(node).ok_or_else(|| {
            TopologyError::InvalidArgument(
                "cannot find the parent of an unknown node".to_string(),
            )
        })?;

        if level == 0 {
            return Err(TopologyError::InvalidArgument(
                "cannot get the parent of the root node".to_string(),
            ));
        }

        if level == entry.level {
            return entry.parent.ok_or_else(root_has_no_parent);
        }

        if level > entry.level {
            return Err(TopologyError::InvalidArgument(
                "cannot ascend to a deeper level".to_string(),
            ));
        }

        let mut ancestor = entry.parent.ok_or_else(root_has_no_parent)?;
        while self.node(ancestor).level > level {
            ancestor = self.node(ancestor).parent.ok_or_else(root_has_no_parent)?;
        }
        self.node(ancestor).parent.ok_or_else(root_has_no_parent)
    }

    /// Label for displaying a node: `name` for branches and valueless
    /// leaves, `name >> value` otherwise.
    pub fn display_label(&self, node: NodeId) -> String {
        let entry = self.node(node);
        match entry.value() {
            Some(value) if !value.is_empty() => {
                format!("{}{}{}", entry.name, NAME_VALUE_DELIMITER, value)
            }
            _ => entry.name.clone(),
        }
    }

    fn derive_id(&self, parent: NodeId, name: &str) -> String {
        let parent_id = &self.node(parent).id;
        if parent_id == ID_DELIMITER {
            format!("{parent_id}{name}")
        } else {
            format!("{parent_id}{ID_DELIMITER}{name}")
        }
    }

    fn alloc(&mut self, node: TopoNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

fn root_has_no_parent() -> TopologyError {
    TopologyError::InvalidArgument("cannot ascend past the root node".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// topology -> host -> (port leaf, services -> http leaf)
    fn sample_tree() -> (TopologyTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = TopologyTree::new("topology");
        let root = tree.root();

        let host = tree.new_child(root, "host");
        tree.add_child(root, host).unwrap();

        let port = tree.new_leaf(host, "port", "30001");
        tree.add_child(host, port).unwrap();

        let services = tree.new_child(host, "services");
        tree.add_child(host, services).unwrap();

        let http = tree.new_leaf(services, "http", "enabled");
        tree.add_child(services, http).unwrap();

        (tree, host, port, services, http)
    }

    #[test]
    fn ids_follow_the_path_formula() {
        let (tree, host, port, services, http) = sample_tree();

        assert_eq!(tree.node(tree.root()).id(), "/");
        assert_eq!(tree.node(host).id(), "/host");
        assert_eq!(tree.node(port).id(), "/host/port");
        assert_eq!(tree.node(services).id(), "/host/services");
        assert_eq!(tree.node(http).id(), "/host/services/http");
    }

    #[test]
    fn levels_increase_by_one_per_generation() {
        let (tree, host, port, services, http) = sample_tree();

        assert_eq!(tree.node(tree.root()).level(), 0);
        assert_eq!(tree.node(host).level(), 1);
        assert_eq!(tree.node(port).level(), 2);
        assert_eq!(tree.node(services).level(), 2);
        assert_eq!(tree.node(http).level(), 3);

        for id in [host, port, services, http] {
            let parent = tree.node(id).parent().unwrap();
            assert_eq!(tree.node(id).level(), tree.node(parent).level() + 1);
        }
    }

    #[test]
    fn add_child_to_leaf_is_rejected() {
        let (mut tree, _, port, _, _) = sample_tree();
        let orphan = tree.new_child(port, "orphan");

        let err = tree.add_child(port, orphan).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidOperation(_)));
    }

    #[test]
    fn set_value_on_branch_with_children_is_rejected() {
        let (mut tree, host, _, _, _) = sample_tree();

        let err = tree.set_value(host, "x").unwrap_err();
        assert!(matches!(err, TopologyError::InvalidOperation(_)));
    }

    #[test]
    fn set_value_turns_an_empty_branch_into_a_leaf() {
        let mut tree = TopologyTree::new("topology");
        let root = tree.root();
        let host = tree.new_child(root, "host");
        tree.add_child(root, host).unwrap();

        assert!(!tree.node(host).is_leaf());
        tree.set_value(host, "standby").unwrap();
        assert!(tree.node(host).is_leaf());
        assert_eq!(tree.node(host).value(), Some("standby"));
    }

    #[test]
    fn set_leaf_transitions() {
        let (mut tree, host, port, _, _) = sample_tree();

        // A populated branch cannot become a leaf.
        let err = tree.set_leaf(host, true).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidOperation(_)));

        // Un-leafing clears the value.
        tree.set_leaf(port, false).unwrap();
        assert!(!tree.node(port).is_leaf());
        assert_eq!(tree.node(port).value(), None);

        // An empty branch can become a valueless leaf.
        tree.set_leaf(port, true).unwrap();
        assert!(tree.node(port).is_leaf());
        assert_eq!(tree.node(port).value(), Some(""));
    }

    #[test]
    fn rename_rewrites_descendant_ids() {
        let (mut tree, host, port, services, http) = sample_tree();

        tree.set_name(host, "standby");

        assert_eq!(tree.node(host).id(), "/standby");
        assert_eq!(tree.node(port).id(), "/standby/port");
        assert_eq!(tree.node(services).id(), "/standby/services");
        assert_eq!(tree.node(http).id(), "/standby/services/http");

        // Renaming to the same name changes nothing.
        let before = tree.node(http).id().to_string();
        tree.set_name(host, "standby");
        assert_eq!(tree.node(http).id(), before);
    }

    #[test]
    fn rename_of_the_root_keeps_its_id() {
        let (mut tree, host, ..) = sample_tree();

        tree.set_name(tree.root(), "renamed");
        assert_eq!(tree.node(tree.root()).id(), "/");
        // Children re-derive from the unchanged root id.
        assert_eq!(tree.node(host).id(), "/host");
    }

    #[test]
    fn delete_child_detaches_and_tolerates_absent_children() {
        let (mut tree, host, port, services, _) = sample_tree();

        tree.delete_child(host, services);
        assert_eq!(tree.node(host).children(), &[port]);

        // Deleting again, or from the wrong parent, is a no-op.
        tree.delete_child(host, services);
        tree.delete_child(tree.root(), port);
        assert_eq!(tree.node(host).children(), &[port]);
    }

    #[test]
    fn root_walks() {
        let (tree, _, _, _, http) = sample_tree();

        assert_eq!(tree.root_of(http), tree.root());
        assert!(tree.is_root(tree.root()));
        assert!(!tree.is_root(http));
    }

    #[test]
    fn detached_nodes_keep_their_explicit_id_when_attached() {
        let mut tree = TopologyTree::new("topology");
        let root = tree.root();

        let detached = tree.new_detached("/host", "host");
        tree.add_child(root, detached).unwrap();

        assert_eq!(tree.node(detached).id(), "/host");
        assert_eq!(tree.node(detached).level(), 1);
        assert_eq!(tree.node(detached).parent(), Some(root));
    }

    #[test]
    fn find_child_by_name_is_case_insensitive_and_shallow() {
        let (tree, host, _, services, http) = sample_tree();
        let root = tree.root();

        assert_eq!(tree.find_child_by_name(root, "HOST"), Some(host));
        assert_eq!(tree.find_child_by_name(host, "Services"), Some(services));
        // One level only: grandchildren are not found.
        assert_eq!(tree.find_child_by_name(root, "http"), None);
        assert_eq!(tree.find_child_by_name(services, "http"), Some(http));
        // Blank names match nothing.
        assert_eq!(tree.find_child_by_name(root, "  "), None);
    }

    #[test]
    fn ancestor_at_level_returns_the_parent_of_the_ancestor() {
        let (tree, host, _, services, http) = sample_tree();
        let root = tree.root();

        // Same level: the node's own parent.
        assert_eq!(tree.ancestor_at_level(http, 3).unwrap(), services);
        // Shallower level: parent of the ancestor at that level.
        assert_eq!(tree.ancestor_at_level(http, 2).unwrap(), host);
        assert_eq!(tree.ancestor_at_level(http, 1).unwrap(), root);
    }

    #[test]
    fn ancestor_at_level_boundary_failures() {
        let (tree, _, _, _, http) = sample_tree();

        let err = tree.ancestor_at_level(http, 0).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidArgument(_)));

        // Deeper than the node itself.
        let err = tree.ancestor_at_level(http, 9).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidArgument(_)));
    }

    #[test]
    fn display_labels() {
        let (tree, host, port, _, _) = sample_tree();

        assert_eq!(tree.display_label(host), "host");
        assert_eq!(tree.display_label(port), "port >> 30001");
    }
}
