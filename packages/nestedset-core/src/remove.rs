use crate::error::Result;
use crate::node::NodeId;
use crate::store::{BulkUpdate, NodeStore, RowFilter};

/// Cascade delete: remove the node together with every descendant, then close
/// the numeric gap the subtree occupied. Missing node or empty store is a
/// successful no-op. Returns the number of rows removed.
pub fn remove_subtree<S: NodeStore>(store: &mut S, id: NodeId) -> Result<u64> {
    if store.count()? == 0 {
        return Ok(0);
    }
    let Some(node) = store.find_by_id(id)? else {
        return Ok(0);
    };

    let removed = store.delete_where(&RowFilter::lft_between(node.lft, node.rght))?;
    let span = node.span();
    store.bulk_update(
        BulkUpdate::ShiftLft(-span),
        &RowFilter::lft_greater_than(node.rght),
    )?;
    store.bulk_update(
        BulkUpdate::ShiftRght(-span),
        &RowFilter::rght_greater_than(node.rght),
    )?;
    Ok(removed)
}

/// Promote delete: remove only the node itself; its children are reparented to
/// the node's former parent (or become roots) and every descendant rises one
/// level. Missing node or empty store is a successful no-op. Returns whether a
/// row was removed.
pub fn promote_children<S: NodeStore>(store: &mut S, id: NodeId) -> Result<bool> {
    if store.count()? == 0 {
        return Ok(false);
    }
    let Some(node) = store.find_by_id(id)? else {
        return Ok(false);
    };

    store.delete_by_id(id)?;
    store.bulk_update(
        BulkUpdate::SetParent(node.parent_id),
        &RowFilter::parent(Some(id)),
    )?;

    // Descendants give up the single unit the node's own lft occupied. They are
    // excluded from the gap-closing lft shift below; their rght values already
    // sit at or below node.rght - 2 after this update, so the rght shift skips
    // them on its own.
    let descendants: Vec<NodeId> = store
        .find_in_interval(node.lft, node.rght)?
        .into_iter()
        .map(|n| n.id)
        .collect();
    store.bulk_update(
        BulkUpdate::ShiftInterval(-1),
        &RowFilter::lft_between(node.lft, node.rght),
    )?;
    store.bulk_update(
        BulkUpdate::ShiftLft(-2),
        &RowFilter::lft_greater_than(node.lft).excluding(descendants),
    )?;
    store.bulk_update(
        BulkUpdate::ShiftRght(-2),
        &RowFilter::rght_greater_than(node.rght),
    )?;
    Ok(true)
}
