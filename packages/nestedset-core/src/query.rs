use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::store::NodeStore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the whole forest, ordered by `lft` ascending.
///
/// A snapshot is an explicit value scoped to the call-site that captured it;
/// read operations never go back to the store mid-call and never observe a
/// concurrent writer's partial state beyond what the store's isolation gives.
#[derive(Clone, Debug, Default)]
pub struct TreeSnapshot {
    nodes: Vec<Node>,
}

/// Owned tree assembled from a snapshot: a node plus its ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeNode {
    pub node: Node,
    pub children: Vec<TreeNode>,
}

impl TreeSnapshot {
    /// Capture the current store contents.
    pub fn capture<S: NodeStore>(store: &S) -> Result<Self> {
        Ok(Self::from_nodes(store.find_all()?))
    }

    /// Build a snapshot from rows obtained elsewhere. Rows are re-sorted by
    /// `lft` so callers need not guarantee order.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Self {
        nodes.sort_by_key(|n| n.lft);
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Direct children of `parent`, in `lft` order. A child must both name the
    /// parent in `parent_id` and have its interval strictly nested inside the
    /// parent's; rows where the two disagree are excluded. Use [`validate`] to
    /// surface such drift instead of masking it.
    ///
    /// [`validate`]: TreeSnapshot::validate
    pub fn children(&self, parent: NodeId) -> Vec<&Node> {
        let Some(parent_node) = self.find(parent) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|n| n.parent_id == Some(parent) && parent_node.contains(n))
            .collect()
    }

    /// Number of rows naming `parent` as their parent.
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.parent_id == Some(parent))
            .count()
    }

    /// Descendant count derived from the interval width.
    pub fn descendant_count(&self, id: NodeId) -> Result<i64> {
        let node = self.find(id).ok_or(Error::NotFound(id))?;
        Ok(node.descendant_count())
    }

    /// Every ancestor of the node, `lft` ascending: root first, immediate
    /// parent last.
    pub fn path(&self, id: NodeId) -> Result<Vec<&Node>> {
        let node = self.find(id).ok_or(Error::NotFound(id))?;
        Ok(self.nodes.iter().filter(|n| n.contains(node)).collect())
    }

    /// Direct parent by pointer; `None` for a root.
    pub fn parent_of(&self, id: NodeId) -> Result<Option<&Node>> {
        let node = self.find(id).ok_or(Error::NotFound(id))?;
        Ok(node.parent_id.and_then(|pid| self.find(pid)))
    }

    /// Root nodes in `lft` order.
    pub fn roots(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_root()).collect()
    }

    /// The root occupying the highest numeric range.
    pub fn last_root(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.is_root())
            .max_by_key(|n| n.rght)
    }

    /// Every node's label prefixed with `separator` repeated once per ancestor,
    /// in traversal (`lft`) order. Depths come from one stack pass over the
    /// snapshot rather than a per-node ancestor scan.
    pub fn selectable_list(&self, separator: &str) -> Vec<(NodeId, String)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut open_rghts: Vec<i64> = Vec::new();
        for node in &self.nodes {
            while open_rghts.last().is_some_and(|&rght| rght < node.lft) {
                open_rghts.pop();
            }
            let depth = open_rghts.len();
            out.push((node.id, format!("{}{}", separator.repeat(depth), node.label)));
            open_rghts.push(node.rght);
        }
        out
    }

    /// Assemble the full forest as owned trees, one per root, built from a
    /// single grouping pass by parent id.
    pub fn tree(&self) -> Vec<TreeNode> {
        let by_parent = self.group_by_parent();
        self.roots()
            .into_iter()
            .map(|root| Self::assemble(root, &by_parent))
            .collect()
    }

    /// Assemble the subtree rooted at `id`.
    pub fn subtree(&self, id: NodeId) -> Result<TreeNode> {
        let node = self.find(id).ok_or(Error::NotFound(id))?;
        let by_parent = self.group_by_parent();
        Ok(Self::assemble(node, &by_parent))
    }

    /// Full invariant check over the snapshot: `rght > lft` everywhere,
    /// interval boundaries distinct, intervals nested or disjoint (never
    /// partially overlapping), and every `parent_id` naming the tightest
    /// enclosing node.
    pub fn validate(&self) -> Result<()> {
        let mut open: Vec<&Node> = Vec::new();
        let mut prev_lft: Option<i64> = None;
        for node in &self.nodes {
            if node.rght <= node.lft {
                return Err(Error::IntervalCorruption(format!(
                    "node {} has rght {} <= lft {}",
                    node.id, node.rght, node.lft
                )));
            }
            if prev_lft == Some(node.lft) {
                return Err(Error::IntervalCorruption(format!(
                    "duplicate lft value {}",
                    node.lft
                )));
            }
            prev_lft = Some(node.lft);

            while open.last().is_some_and(|top| top.rght < node.lft) {
                open.pop();
            }
            match open.last() {
                Some(top) => {
                    if !top.contains(node) {
                        return Err(Error::IntervalCorruption(format!(
                            "nodes {} and {} partially overlap",
                            top.id, node.id
                        )));
                    }
                    if node.parent_id != Some(top.id) {
                        return Err(Error::IntervalCorruption(format!(
                            "node {} parent_id does not name its tightest enclosing node {}",
                            node.id, top.id
                        )));
                    }
                }
                None => {
                    if node.parent_id.is_some() {
                        return Err(Error::IntervalCorruption(format!(
                            "node {} has a parent_id but no enclosing interval",
                            node.id
                        )));
                    }
                }
            }
            open.push(node);
        }
        Ok(())
    }

    /// Children grouped by parent pointer, preserving snapshot (`lft`) order.
    fn group_by_parent(&self) -> HashMap<Option<NodeId>, Vec<&Node>> {
        let mut by_parent: HashMap<Option<NodeId>, Vec<&Node>> = HashMap::new();
        for node in &self.nodes {
            by_parent.entry(node.parent_id).or_default().push(node);
        }
        by_parent
    }

    fn assemble(node: &Node, by_parent: &HashMap<Option<NodeId>, Vec<&Node>>) -> TreeNode {
        let children = by_parent
            .get(&Some(node.id))
            .map(|kids| {
                kids.iter()
                    .map(|child| Self::assemble(child, by_parent))
                    .collect()
            })
            .unwrap_or_default();
        TreeNode {
            node: node.clone(),
            children,
        }
    }
}
