use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a node row. Assigned by the store, immutable afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the flat relation backing the forest.
///
/// `parent_id` is a structural pointer only; ancestry is authoritatively encoded
/// by the `(lft, rght)` interval. Every committed state keeps `rght > lft` and
/// intervals pairwise nested-or-disjoint; both fields are meaningless between
/// the statements of an in-flight mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub lft: i64,
    pub rght: i64,
    /// Display attribute, opaque to the interval algorithms.
    pub label: String,
}

impl Node {
    pub fn new(
        id: NodeId,
        parent_id: Option<NodeId>,
        lft: i64,
        rght: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent_id,
            lft,
            rght,
            label: label.into(),
        }
    }

    /// Numeric space occupied by the node plus all of its descendants.
    pub fn span(&self) -> i64 {
        self.rght - self.lft + 1
    }

    /// Number of descendants, derived purely from the interval width.
    pub fn descendant_count(&self) -> i64 {
        (self.rght - self.lft - 1) / 2
    }

    pub fn is_leaf(&self) -> bool {
        self.rght == self.lft + 1
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Strict interval containment, i.e. `self` is an ancestor of `other`.
    pub fn contains(&self, other: &Node) -> bool {
        self.lft < other.lft && other.rght < self.rght
    }
}
