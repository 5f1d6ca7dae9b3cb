use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::store::{BulkUpdate, NodeStore, RowFilter};

/// Interval computed for a node about to be inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lft: i64,
    pub rght: i64,
}

/// Compute and commit the `(lft, rght)` pair for one new node, shifting existing
/// rows as needed. The returned interval is the placement for the row the caller
/// inserts afterwards; both steps belong in one enclosing transaction.
///
/// Placement rules:
/// - empty store: `(1, 2)`;
/// - new root: appended after the root with the largest `rght`, no shifting;
/// - child of a childless parent: opens the parent's interval at `parent.lft`;
/// - child of a parent with children: anchored at the current first child's
///   `rght`, placing the new node immediately after it.
///
/// The two bulk shifts update the `rght` column before the `lft` column.
pub fn allocate<S: NodeStore>(store: &mut S, parent: Option<NodeId>) -> Result<Interval> {
    let Some(parent_id) = parent else {
        // Roots always append to the end of the numeric space.
        return Ok(match store.find_root_max_rght()? {
            None => Interval { lft: 1, rght: 2 },
            Some(max_rght) => Interval {
                lft: max_rght + 1,
                rght: max_rght + 2,
            },
        });
    };

    let parent_row = store
        .find_by_id(parent_id)?
        .ok_or(Error::ReferentialIntegrity(parent_id))?;

    let anchor = match store.find_first_child(parent_id)? {
        Some(first_child) => first_child.rght,
        None => parent_row.lft,
    };

    store.bulk_update(BulkUpdate::ShiftRght(2), &RowFilter::rght_greater_than(anchor))?;
    store.bulk_update(BulkUpdate::ShiftLft(2), &RowFilter::lft_greater_than(anchor))?;

    Ok(Interval {
        lft: anchor + 1,
        rght: anchor + 2,
    })
}

/// Allocate an interval and insert the row in one call.
pub fn insert_node<S: NodeStore>(
    store: &mut S,
    id: NodeId,
    parent: Option<NodeId>,
    label: impl Into<String>,
) -> Result<Node> {
    let interval = allocate(store, parent)?;
    let node = Node::new(id, parent, interval.lft, interval.rght, label);
    store.insert(node.clone())?;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryNodeStore;

    #[test]
    fn first_root_gets_unit_interval() {
        let mut store = MemoryNodeStore::new();
        let a = insert_node(&mut store, NodeId(1), None, "a").unwrap();
        assert_eq!((a.lft, a.rght), (1, 2));
    }

    #[test]
    fn new_roots_append_without_shifting() {
        let mut store = MemoryNodeStore::new();
        insert_node(&mut store, NodeId(1), None, "a").unwrap();
        let b = insert_node(&mut store, NodeId(2), None, "b").unwrap();
        assert_eq!((b.lft, b.rght), (3, 4));
        let a = store.find_by_id(NodeId(1)).unwrap().unwrap();
        assert_eq!((a.lft, a.rght), (1, 2));
    }

    #[test]
    fn missing_parent_is_a_referential_integrity_error() {
        let mut store = MemoryNodeStore::new();
        insert_node(&mut store, NodeId(1), None, "a").unwrap();
        let err = allocate(&mut store, Some(NodeId(42)));
        assert!(matches!(err, Err(Error::ReferentialIntegrity(NodeId(42)))));
    }
}
