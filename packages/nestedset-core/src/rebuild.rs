use crate::error::Result;
use crate::node::NodeId;
use crate::store::{BulkUpdate, NodeStore, Page, RowFilter};

/// Children are fetched in pages of this size during a rebuild, guarding
/// unbounded fetches for very wide levels.
pub const REBUILD_PAGE_SIZE: usize = 999;

/// Recompute `(lft, rght)` for every node in the forest from `parent_id`
/// pointers alone, discarding whatever intervals are stored. Siblings are
/// numbered in `id` ascending order (creation order, not label). Root-level
/// nodes run through the same recursion, so their numeric ranges come out
/// contiguous under one shared counter.
///
/// This is the canonical normalization pass after bulk `parent_id` edits.
/// Returns the final counter value.
pub fn rebuild_forest<S: NodeStore>(store: &mut S) -> Result<i64> {
    renumber(store, 1, None)
}

fn renumber<S: NodeStore>(store: &mut S, mut counter: i64, parent: Option<NodeId>) -> Result<i64> {
    let mut page = Page::first(REBUILD_PAGE_SIZE);
    let mut children = store.find_by_parent(parent, page)?;
    let has_children = !children.is_empty();

    if let Some(parent_id) = parent {
        if has_children {
            store.bulk_update(BulkUpdate::SetLft(counter), &RowFilter::id(parent_id))?;
            counter += 1;
        } else {
            store.bulk_update(
                BulkUpdate::SetInterval(counter, counter + 1),
                &RowFilter::id(parent_id),
            )?;
            return Ok(counter + 2);
        }
    }

    loop {
        let page_was_full = children.len() == REBUILD_PAGE_SIZE;
        for child in &children {
            counter = renumber(store, counter, Some(child.id))?;
        }
        if !page_was_full {
            break;
        }
        page = page.next();
        children = store.find_by_parent(parent, page)?;
        if children.is_empty() {
            break;
        }
    }

    if let Some(parent_id) = parent {
        store.bulk_update(BulkUpdate::SetRght(counter), &RowFilter::id(parent_id))?;
        counter += 1;
    }
    Ok(counter)
}
