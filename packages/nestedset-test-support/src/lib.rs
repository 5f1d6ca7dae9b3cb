#![forbid(unsafe_code)]
//! Conformance checks for [`NodeStore`] backends. Each check builds its own
//! store through the supplied factory, so backends with external state (a
//! database table, say) should hand out isolated instances.
//!
//! Checks panic on violation; run them from a backend's test suite.

use nestedset_core::{BulkUpdate, Error, Node, NodeId, NodeStore, Page, RowFilter};

/// Run the full suite against stores produced by `make`.
pub fn check_node_store<S, F>(mut make: F)
where
    S: NodeStore,
    F: FnMut() -> S,
{
    check_find_all_orders_by_lft(&mut make());
    check_find_by_parent_orders_by_id_and_pages(&mut make());
    check_point_lookups(&mut make());
    check_bulk_update_filters(&mut make());
    check_delete_where(&mut make());
    check_transaction_rollback(&mut make());
}

fn node(id: u64, parent: Option<u64>, lft: i64, rght: i64) -> Node {
    Node::new(NodeId(id), parent.map(NodeId), lft, rght, format!("n{id}"))
}

fn seed_forest<S: NodeStore>(store: &mut S) {
    // a=(1,8){b=(2,5){d=(3,4)}, c=(6,7)}, e=(9,10)
    for row in [
        node(1, None, 1, 8),
        node(2, Some(1), 2, 5),
        node(3, Some(1), 6, 7),
        node(4, Some(2), 3, 4),
        node(5, None, 9, 10),
    ] {
        store.insert(row).expect("seed insert");
    }
}

fn check_find_all_orders_by_lft<S: NodeStore>(store: &mut S) {
    store.insert(node(1, None, 3, 4)).unwrap();
    store.insert(node(2, None, 1, 2)).unwrap();
    store.insert(node(3, None, 5, 6)).unwrap();
    let ids: Vec<u64> = store
        .find_all()
        .unwrap()
        .into_iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(ids, [2, 1, 3], "find_all must order by lft ascending");
    assert_eq!(store.count().unwrap(), 3);
}

fn check_find_by_parent_orders_by_id_and_pages<S: NodeStore>(store: &mut S) {
    store.insert(node(1, None, 1, 8)).unwrap();
    // insertion order deliberately scrambled; id order must win over lft order
    store.insert(node(4, Some(1), 2, 3)).unwrap();
    store.insert(node(2, Some(1), 6, 7)).unwrap();
    store.insert(node(3, Some(1), 4, 5)).unwrap();

    let page = Page::first(2);
    let first: Vec<u64> = store
        .find_by_parent(Some(NodeId(1)), page)
        .unwrap()
        .into_iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(first, [2, 3], "find_by_parent must order by id ascending");
    let second: Vec<u64> = store
        .find_by_parent(Some(NodeId(1)), page.next())
        .unwrap()
        .into_iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(second, [4], "pagination must continue where the page ended");

    let roots: Vec<u64> = store
        .find_by_parent(None, Page::first(10))
        .unwrap()
        .into_iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(roots, [1], "None selects root rows");
}

fn check_point_lookups<S: NodeStore>(store: &mut S) {
    seed_forest(store);
    assert_eq!(store.find_root_max_rght().unwrap(), Some(10));
    assert_eq!(
        store.find_first_child(NodeId(1)).unwrap().unwrap().id,
        NodeId(2),
        "find_first_child must pick the smallest lft"
    );
    assert_eq!(store.find_by_lft(6).unwrap().unwrap().id, NodeId(3));
    assert_eq!(store.find_by_rght(5).unwrap().unwrap().id, NodeId(2));
    assert!(store.find_by_lft(99).unwrap().is_none());
    let in_range: Vec<u64> = store
        .find_in_interval(2, 6)
        .unwrap()
        .into_iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(in_range, [2, 4, 3], "find_in_interval filters on lft, ordered by lft");
}

fn check_bulk_update_filters<S: NodeStore>(store: &mut S) {
    seed_forest(store);

    let changed = store
        .bulk_update(BulkUpdate::ShiftRght(2), &RowFilter::rght_greater_than(7))
        .unwrap();
    assert_eq!(changed, 2, "rght > 7 matches a and e");
    assert_eq!(store.find_by_id(NodeId(1)).unwrap().unwrap().rght, 10);

    let changed = store
        .bulk_update(
            BulkUpdate::ShiftInterval(100),
            &RowFilter::lft_between(2, 6).excluding([NodeId(4)]),
        )
        .unwrap();
    assert_eq!(changed, 2, "exclusion list must drop already-moved rows");
    assert_eq!(store.find_by_id(NodeId(4)).unwrap().unwrap().lft, 3);

    let changed = store
        .bulk_update(
            BulkUpdate::SetParent(None),
            &RowFilter::parent(Some(NodeId(1))),
        )
        .unwrap();
    assert_eq!(changed, 2);
    assert!(store.find_by_id(NodeId(2)).unwrap().unwrap().parent_id.is_none());

    store
        .bulk_update(BulkUpdate::SetInterval(41, 42), &RowFilter::id(NodeId(5)))
        .unwrap();
    let e = store.find_by_id(NodeId(5)).unwrap().unwrap();
    assert_eq!((e.lft, e.rght), (41, 42));
}

fn check_delete_where<S: NodeStore>(store: &mut S) {
    seed_forest(store);
    let removed = store.delete_where(&RowFilter::lft_between(1, 8)).unwrap();
    assert_eq!(removed, 4, "lft between 1 and 8 covers the whole first tree");
    assert_eq!(store.count().unwrap(), 1);
    assert!(store.delete_by_id(NodeId(5)).unwrap());
    assert!(!store.delete_by_id(NodeId(5)).unwrap());
}

fn check_transaction_rollback<S: NodeStore>(store: &mut S) {
    seed_forest(store);
    let result = store.run_in_transaction(|s| {
        s.bulk_update(BulkUpdate::ShiftLft(50), &RowFilter::default())?;
        s.delete_by_id(NodeId(5))?;
        Err::<(), _>(Error::Storage("forced failure".into()))
    });
    assert!(result.is_err());
    assert_eq!(store.count().unwrap(), 5, "rollback must restore deleted rows");
    assert_eq!(
        store.find_by_id(NodeId(1)).unwrap().unwrap().lft,
        1,
        "rollback must restore shifted columns"
    );

    let committed = store
        .run_in_transaction(|s| s.bulk_update(BulkUpdate::ShiftLft(1), &RowFilter::id(NodeId(5))))
        .unwrap();
    assert_eq!(committed, 1);
    assert_eq!(store.find_by_id(NodeId(5)).unwrap().unwrap().lft, 10);
}
