use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::store::{BulkUpdate, NodeStore, RowFilter};

#[derive(Clone, Copy)]
enum Direction {
    Left,
    Right,
}

/// Swap the node's subtree with its immediate left sibling (the node whose
/// `rght` is `node.lft - 1`). Both subtrees keep their internal order; no other
/// row is touched. Returns `false` without changing anything when there is no
/// left sibling.
pub fn move_left<S: NodeStore>(store: &mut S, id: NodeId) -> Result<bool> {
    swap_with_sibling(store, id, Direction::Left)
}

/// Swap the node's subtree with its immediate right sibling (the node whose
/// `lft` is `node.rght + 1`). Returns `false` when there is no right sibling.
pub fn move_right<S: NodeStore>(store: &mut S, id: NodeId) -> Result<bool> {
    swap_with_sibling(store, id, Direction::Right)
}

fn swap_with_sibling<S: NodeStore>(store: &mut S, id: NodeId, direction: Direction) -> Result<bool> {
    let node = store.find_by_id(id)?.ok_or(Error::NotFound(id))?;
    let sibling = match direction {
        Direction::Left => store.find_by_rght(node.lft - 1)?,
        Direction::Right => store.find_by_lft(node.rght + 1)?,
    };
    let Some(sibling) = sibling else {
        return Ok(false);
    };

    // Everything inside the node's interval relocates with the first shift and
    // must not be shifted again by the second.
    let already_moving: Vec<NodeId> = store
        .find_in_interval(node.lft, node.rght)?
        .into_iter()
        .map(|n| n.id)
        .collect();

    let (toward_sibling, into_vacated) = match direction {
        Direction::Left => (-sibling.span(), node.span()),
        Direction::Right => (sibling.span(), -node.span()),
    };

    store.bulk_update(
        BulkUpdate::ShiftInterval(toward_sibling),
        &RowFilter::lft_between(node.lft, node.rght),
    )?;
    store.bulk_update(
        BulkUpdate::ShiftInterval(into_vacated),
        &RowFilter::lft_between(sibling.lft, sibling.rght).excluding(already_moving),
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::insert_node;
    use crate::store::MemoryNodeStore;

    #[test]
    fn move_without_sibling_is_a_noop() {
        let mut store = MemoryNodeStore::new();
        insert_node(&mut store, NodeId(1), None, "a").unwrap();
        assert!(!move_left(&mut store, NodeId(1)).unwrap());
        assert!(!move_right(&mut store, NodeId(1)).unwrap());
        let a = store.find_by_id(NodeId(1)).unwrap().unwrap();
        assert_eq!((a.lft, a.rght), (1, 2));
    }

    #[test]
    fn missing_node_is_an_error() {
        let mut store = MemoryNodeStore::new();
        assert!(matches!(
            move_left(&mut store, NodeId(9)),
            Err(Error::NotFound(NodeId(9)))
        ));
    }

    #[test]
    fn swaps_sibling_subtrees_of_unequal_size() {
        // a=(1,2), b=(3,6) with child c=(4,5)
        let mut store = MemoryNodeStore::new();
        insert_node(&mut store, NodeId(1), None, "a").unwrap();
        insert_node(&mut store, NodeId(2), None, "b").unwrap();
        insert_node(&mut store, NodeId(3), Some(NodeId(2)), "c").unwrap();

        assert!(move_left(&mut store, NodeId(2)).unwrap());

        let b = store.find_by_id(NodeId(2)).unwrap().unwrap();
        let c = store.find_by_id(NodeId(3)).unwrap().unwrap();
        let a = store.find_by_id(NodeId(1)).unwrap().unwrap();
        assert_eq!((b.lft, b.rght), (1, 4));
        assert_eq!((c.lft, c.rght), (2, 3));
        assert_eq!((a.lft, a.rght), (5, 6));
    }
}
