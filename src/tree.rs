//! Referral tree storage — an arena of nodes with a name index.
//!
//! The tree owns every node in a flat arena addressed by [`NodeId`]; parent
//! back-references and child lists are ids, never owning pointers. A name
//! index maps referral-log identifiers to ids for external lookups.
//!
//! ## Invariants
//!
//! - Id 0 is always the synthetic super-root (`GENESIS`), created by `new()`.
//! - A node's parent pointer is set at creation and never changes.
//! - `size(n) == 1 + Σ size(c)` for attached children; sizes are folded into
//!   the direct parent at attach time only, which is sufficient because
//!   construction attaches bottom-up (a child's subtree is complete before
//!   the child itself is attached).

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::model::{Node, NodeId};
use crate::{Error, Result};

/// Name of the synthetic super-root above all natural roots.
pub const ROOT_NAME: &str = "GENESIS";

/// Ancestor chains are almost always short; spill to the heap past 8 levels.
pub type AncestorChain = SmallVec<[NodeId; 8]>;

/// Arena-backed referral tree.
#[derive(Debug, Clone)]
pub struct ReferralTree {
    nodes: Vec<Node>,
    /// name → id, the run-wide primary-key index.
    index: HashMap<String, NodeId>,
}

impl ReferralTree {
    /// Create a tree containing only the super-root.
    pub fn new() -> Self {
        let root = Node::new(NodeId(0), ROOT_NAME, None);
        let mut index = HashMap::new();
        index.insert(ROOT_NAME.to_string(), NodeId(0));
        Self { nodes: vec![root], index }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Look up a node by its referral-log identifier.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|id| self.node(*id))
    }

    /// Number of nodes, super-root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in creation order, super-root first.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a node under `parent`. The parent pointer is live immediately
    /// (ancestor chains through this node resolve before it is attached);
    /// the parent's child list and size are untouched until [`attach`].
    ///
    /// [`attach`]: ReferralTree::attach
    pub fn create_node(&mut self, name: &str, parent: NodeId) -> Result<NodeId> {
        if self.index.contains_key(name) {
            // The builder validates referred-once upfront; this guards direct
            // callers constructing trees by hand.
            return Err(Error::DuplicateParent {
                child: name.to_string(),
                first: self
                    .node(self.index[name])
                    .parent
                    .map(|p| self.node(p).name.clone())
                    .unwrap_or_default(),
                second: self.node(parent).name.clone(),
            });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, name, Some(parent)));
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Attach a completed child subtree: append to the parent's child list
    /// and fold the child's final size into the parent.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        let child_size = self.node(child).size;
        let parent_node = self.node_mut(parent);
        parent_node.children.push(child);
        parent_node.size += child_size;
    }

    // ========================================================================
    // Ancestor queries
    // ========================================================================

    /// Chain from `start` (inclusive) up to the super-root (inclusive),
    /// nearest first. Position `i` (0-based) is distance `i + 1` from the
    /// node whose attachment triggered the walk.
    pub fn ancestors_of(&self, start: NodeId) -> AncestorChain {
        let mut chain = AncestorChain::new();
        let mut current = Some(start);
        while let Some(id) = current {
            chain.push(id);
            current = self.node(id).parent;
        }
        chain
    }

    /// Names of the ancestors strictly above the named node, nearest first,
    /// super-root included. Unknown identifiers report `NotFound` rather
    /// than aborting the caller's run.
    pub fn ancestor_names(&self, name: &str) -> Result<Vec<String>> {
        let node = self
            .find(name)
            .ok_or_else(|| Error::NotFound(format!("node '{name}'")))?;
        let mut result = Vec::new();
        let mut current = node.parent;
        while let Some(id) = current {
            let ancestor = self.node(id);
            result.push(ancestor.name.clone());
            current = ancestor.parent;
        }
        Ok(result)
    }
}

impl Default for ReferralTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_level_tree() -> (ReferralTree, NodeId, NodeId, NodeId) {
        // GENESIS -> a -> b -> c, attached bottom-up like the builder does.
        let mut tree = ReferralTree::new();
        let a = tree.create_node("a", tree.root()).unwrap();
        let b = tree.create_node("b", a).unwrap();
        let c = tree.create_node("c", b).unwrap();
        tree.attach(b, c);
        tree.attach(a, b);
        let root = tree.root();
        tree.attach(root, a);
        (tree, a, b, c)
    }

    #[test]
    fn test_new_has_only_genesis() {
        let tree = ReferralTree::new();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(tree.root()).name, ROOT_NAME);
        assert!(tree.node(tree.root()).is_root());
    }

    #[test]
    fn test_sizes_fold_bottom_up() {
        let (tree, a, b, c) = three_level_tree();
        assert_eq!(tree.node(c).size, 1);
        assert_eq!(tree.node(b).size, 2);
        assert_eq!(tree.node(a).size, 3);
        assert_eq!(tree.node(tree.root()).size, 4);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = ReferralTree::new();
        let p = tree.create_node("p", tree.root()).unwrap();
        let x = tree.create_node("x", p).unwrap();
        let y = tree.create_node("y", p).unwrap();
        tree.attach(p, x);
        tree.attach(p, y);
        assert_eq!(tree.node(p).children, vec![x, y]);
    }

    #[test]
    fn test_ancestors_of_walks_to_root() {
        let (tree, a, b, c) = three_level_tree();
        let chain: Vec<NodeId> = tree.ancestors_of(b).into_iter().collect();
        assert_eq!(chain, vec![b, a, tree.root()]);
        // Parent pointers resolve even before attach.
        assert_eq!(tree.node(c).parent, Some(b));
    }

    #[test]
    fn test_ancestor_names_excludes_self() {
        let (tree, ..) = three_level_tree();
        assert_eq!(
            tree.ancestor_names("c").unwrap(),
            vec!["b".to_string(), "a".to_string(), ROOT_NAME.to_string()]
        );
    }

    #[test]
    fn test_ancestor_names_unknown_is_not_found() {
        let tree = ReferralTree::new();
        assert!(matches!(
            tree.ancestor_names("ghost"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut tree = ReferralTree::new();
        let a = tree.create_node("a", tree.root()).unwrap();
        let err = tree.create_node("a", a).unwrap_err();
        assert!(matches!(err, Error::DuplicateParent { .. }));
    }
}
