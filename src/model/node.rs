//! Node in the referral tree.

use serde::{Deserialize, Serialize};

/// Opaque node identifier: an index into the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A participant in the referral tree.
///
/// `parent` is a back-reference only; ownership runs top-down through
/// `children`. The parent pointer is set at creation, while `children` and
/// `size` change only when a completed child subtree is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Unique identifier from the referral log; primary key across the run.
    pub name: String,
    /// `None` only for the synthetic super-root.
    pub parent: Option<NodeId>,
    /// Insertion order, which is significant: gravity redistribution scans
    /// first-match-wins over this order.
    pub children: Vec<NodeId>,
    /// Nodes in the subtree rooted here, including this node.
    pub size: u64,
    /// Accumulated benefit awarded across all distribution events.
    pub commission: f64,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            size: 1,
            commission: 0.0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
