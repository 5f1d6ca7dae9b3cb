use crate::error::{Error, Result};
use crate::node::{Node, NodeId};

/// One page of a paginated fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: usize,
}

impl Page {
    pub fn first(size: usize) -> Self {
        Self { number: 0, size }
    }

    pub fn next(self) -> Self {
        Self {
            number: self.number + 1,
            size: self.size,
        }
    }

    pub fn offset(&self) -> usize {
        self.number as usize * self.size
    }
}

/// Typed row predicate for bulk updates and deletes. Conditions that are set
/// must all hold; an empty filter matches every row. Never rendered to
/// executable text by the core; backends translate it to their own
/// parameterized form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub id_is: Option<NodeId>,
    pub parent_is: Option<Option<NodeId>>,
    pub lft_gt: Option<i64>,
    pub rght_gt: Option<i64>,
    /// Inclusive on both ends.
    pub lft_between: Option<(i64, i64)>,
    /// Rows already relocated by an earlier statement of the same operation.
    pub exclude_ids: Vec<NodeId>,
}

impl RowFilter {
    pub fn id(id: NodeId) -> Self {
        Self {
            id_is: Some(id),
            ..Self::default()
        }
    }

    pub fn parent(parent: Option<NodeId>) -> Self {
        Self {
            parent_is: Some(parent),
            ..Self::default()
        }
    }

    pub fn lft_greater_than(value: i64) -> Self {
        Self {
            lft_gt: Some(value),
            ..Self::default()
        }
    }

    pub fn rght_greater_than(value: i64) -> Self {
        Self {
            rght_gt: Some(value),
            ..Self::default()
        }
    }

    pub fn lft_between(lo: i64, hi: i64) -> Self {
        Self {
            lft_between: Some((lo, hi)),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(id) = self.id_is {
            if node.id != id {
                return false;
            }
        }
        if let Some(parent) = self.parent_is {
            if node.parent_id != parent {
                return false;
            }
        }
        if let Some(bound) = self.lft_gt {
            if node.lft <= bound {
                return false;
            }
        }
        if let Some(bound) = self.rght_gt {
            if node.rght <= bound {
                return false;
            }
        }
        if let Some((lo, hi)) = self.lft_between {
            if node.lft < lo || node.lft > hi {
                return false;
            }
        }
        !self.exclude_ids.contains(&node.id)
    }
}

/// Typed column mutation applied to every row matching a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkUpdate {
    ShiftLft(i64),
    ShiftRght(i64),
    /// Shift `lft` and `rght` by the same delta, relocating a subtree whole.
    ShiftInterval(i64),
    SetLft(i64),
    SetRght(i64),
    SetInterval(i64, i64),
    SetParent(Option<NodeId>),
}

impl BulkUpdate {
    /// In-place application, shared by in-process backends.
    pub fn apply_to(&self, node: &mut Node) {
        match *self {
            BulkUpdate::ShiftLft(delta) => node.lft += delta,
            BulkUpdate::ShiftRght(delta) => node.rght += delta,
            BulkUpdate::ShiftInterval(delta) => {
                node.lft += delta;
                node.rght += delta;
            }
            BulkUpdate::SetLft(value) => node.lft = value,
            BulkUpdate::SetRght(value) => node.rght = value,
            BulkUpdate::SetInterval(lft, rght) => {
                node.lft = lft;
                node.rght = rght;
            }
            BulkUpdate::SetParent(parent) => node.parent_id = parent,
        }
    }
}

/// Storage contract consumed by the interval algorithms.
///
/// Implementations supply row access, predicate-based bulk updates, and an
/// atomic transaction scope. The core never issues queries itself and never
/// builds executable text from interval values.
pub trait NodeStore {
    fn find_by_id(&self, id: NodeId) -> Result<Option<Node>>;

    /// Every row, ordered by `lft` ascending. Snapshot source for queries.
    fn find_all(&self) -> Result<Vec<Node>>;

    /// Direct children of `parent` (roots for `None`), ordered by `id`
    /// ascending. The id order is the rebuild tie-break: creation order,
    /// not label.
    fn find_by_parent(&self, parent: Option<NodeId>, page: Page) -> Result<Vec<Node>>;

    /// Rows with `lft` in `[lo, hi]`, ordered by `lft` ascending.
    fn find_in_interval(&self, lo: i64, hi: i64) -> Result<Vec<Node>>;

    /// Maximum `rght` among root rows, if any root exists.
    fn find_root_max_rght(&self) -> Result<Option<i64>>;

    /// Child of `parent` with the smallest `lft`.
    fn find_first_child(&self, parent: NodeId) -> Result<Option<Node>>;

    fn find_by_rght(&self, rght: i64) -> Result<Option<Node>>;

    fn find_by_lft(&self, lft: i64) -> Result<Option<Node>>;

    fn count(&self) -> Result<u64>;

    fn insert(&mut self, node: Node) -> Result<()>;

    /// Returns whether a row was removed.
    fn delete_by_id(&mut self, id: NodeId) -> Result<bool>;

    /// Returns the number of rows removed.
    fn delete_where(&mut self, filter: &RowFilter) -> Result<u64>;

    /// Returns the number of rows changed.
    fn bulk_update(&mut self, update: BulkUpdate, filter: &RowFilter) -> Result<u64>;

    /// Atomic scoped execution: every change made by `f` is rolled back when
    /// it returns an error.
    fn run_in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T>
    where
        Self: Sized;
}

/// In-memory vector-backed store for tests, benches, and embedding without a
/// database. Transactions are snapshot/restore over the whole row set.
#[derive(Clone, Debug, Default)]
pub struct MemoryNodeStore {
    rows: Vec<Node>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut store = Self::new();
        for row in rows {
            store.insert(row)?;
        }
        Ok(store)
    }
}

impl NodeStore for MemoryNodeStore {
    fn find_by_id(&self, id: NodeId) -> Result<Option<Node>> {
        Ok(self.rows.iter().find(|n| n.id == id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Node>> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|n| n.lft);
        Ok(rows)
    }

    fn find_by_parent(&self, parent: Option<NodeId>, page: Page) -> Result<Vec<Node>> {
        let mut rows: Vec<Node> = self
            .rows
            .iter()
            .filter(|n| n.parent_id == parent)
            .cloned()
            .collect();
        rows.sort_by_key(|n| n.id);
        let start = page.offset().min(rows.len());
        let end = (start + page.size).min(rows.len());
        Ok(rows[start..end].to_vec())
    }

    fn find_in_interval(&self, lo: i64, hi: i64) -> Result<Vec<Node>> {
        let mut rows: Vec<Node> = self
            .rows
            .iter()
            .filter(|n| n.lft >= lo && n.lft <= hi)
            .cloned()
            .collect();
        rows.sort_by_key(|n| n.lft);
        Ok(rows)
    }

    fn find_root_max_rght(&self) -> Result<Option<i64>> {
        Ok(self
            .rows
            .iter()
            .filter(|n| n.parent_id.is_none())
            .map(|n| n.rght)
            .max())
    }

    fn find_first_child(&self, parent: NodeId) -> Result<Option<Node>> {
        Ok(self
            .rows
            .iter()
            .filter(|n| n.parent_id == Some(parent))
            .min_by_key(|n| n.lft)
            .cloned())
    }

    fn find_by_rght(&self, rght: i64) -> Result<Option<Node>> {
        Ok(self.rows.iter().find(|n| n.rght == rght).cloned())
    }

    fn find_by_lft(&self, lft: i64) -> Result<Option<Node>> {
        Ok(self.rows.iter().find(|n| n.lft == lft).cloned())
    }

    fn count(&self) -> Result<u64> {
        Ok(self.rows.len() as u64)
    }

    fn insert(&mut self, node: Node) -> Result<()> {
        if self.rows.iter().any(|n| n.id == node.id) {
            return Err(Error::Storage(format!("duplicate node id: {}", node.id)));
        }
        self.rows.push(node);
        Ok(())
    }

    fn delete_by_id(&mut self, id: NodeId) -> Result<bool> {
        let before = self.rows.len();
        self.rows.retain(|n| n.id != id);
        Ok(self.rows.len() < before)
    }

    fn delete_where(&mut self, filter: &RowFilter) -> Result<u64> {
        let before = self.rows.len();
        self.rows.retain(|n| !filter.matches(n));
        Ok((before - self.rows.len()) as u64)
    }

    fn bulk_update(&mut self, update: BulkUpdate, filter: &RowFilter) -> Result<u64> {
        let mut changed = 0;
        for node in self.rows.iter_mut().filter(|n| filter.matches(n)) {
            update.apply_to(node);
            changed += 1;
        }
        Ok(changed)
    }

    fn run_in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T>
    where
        Self: Sized,
    {
        let checkpoint = self.rows.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.rows = checkpoint;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(rows: &[(u64, Option<u64>, i64, i64)]) -> MemoryNodeStore {
        let rows = rows.iter().map(|&(id, parent, lft, rght)| {
            Node::new(
                NodeId(id),
                parent.map(NodeId),
                lft,
                rght,
                format!("n{id}"),
            )
        });
        MemoryNodeStore::from_rows(rows).unwrap()
    }

    #[test]
    fn find_all_orders_by_lft() {
        let store = store_with(&[(1, None, 5, 6), (2, None, 1, 2), (3, None, 3, 4)]);
        let ids: Vec<_> = store.find_all().unwrap().into_iter().map(|n| n.id.0).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn find_by_parent_orders_by_id_and_pages() {
        let store = store_with(&[
            (3, Some(1), 6, 7),
            (2, Some(1), 4, 5),
            (1, None, 1, 8),
            (4, Some(1), 2, 3),
        ]);
        let page = Page::first(2);
        let first: Vec<_> = store
            .find_by_parent(Some(NodeId(1)), page)
            .unwrap()
            .into_iter()
            .map(|n| n.id.0)
            .collect();
        assert_eq!(first, [2, 3]);
        let second: Vec<_> = store
            .find_by_parent(Some(NodeId(1)), page.next())
            .unwrap()
            .into_iter()
            .map(|n| n.id.0)
            .collect();
        assert_eq!(second, [4]);
    }

    #[test]
    fn bulk_update_respects_exclusions() {
        let mut store = store_with(&[(1, None, 1, 4), (2, Some(1), 2, 3)]);
        let changed = store
            .bulk_update(
                BulkUpdate::ShiftInterval(10),
                &RowFilter::lft_between(1, 4).excluding([NodeId(2)]),
            )
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(store.find_by_id(NodeId(1)).unwrap().unwrap().lft, 11);
        assert_eq!(store.find_by_id(NodeId(2)).unwrap().unwrap().lft, 2);
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let mut store = store_with(&[(1, None, 1, 2)]);
        let result: Result<()> = store.run_in_transaction(|s| {
            s.bulk_update(BulkUpdate::ShiftLft(5), &RowFilter::default())?;
            Err(Error::Storage("forced".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.find_by_id(NodeId(1)).unwrap().unwrap().lft, 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut store = store_with(&[(1, None, 1, 2)]);
        let err = store.insert(Node::new(NodeId(1), None, 3, 4, "dup"));
        assert!(matches!(err, Err(Error::Storage(_))));
    }
}
