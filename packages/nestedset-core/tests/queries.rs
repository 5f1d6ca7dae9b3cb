use nestedset_core::{insert_node, MemoryNodeStore, NodeId, TreeSnapshot};

/// Built through the allocator so intervals match what production inserts
/// produce: a{b{d}, c}, e.
fn snapshot() -> TreeSnapshot {
    let mut store = MemoryNodeStore::new();
    insert_node(&mut store, NodeId(1), None, "a").unwrap();
    insert_node(&mut store, NodeId(5), None, "e").unwrap();
    insert_node(&mut store, NodeId(2), Some(NodeId(1)), "b").unwrap();
    insert_node(&mut store, NodeId(3), Some(NodeId(1)), "c").unwrap();
    insert_node(&mut store, NodeId(4), Some(NodeId(2)), "d").unwrap();
    TreeSnapshot::capture(&store).unwrap()
}

#[test]
fn snapshot_queries_agree_with_each_other() {
    let snap = snapshot();
    snap.validate().unwrap();

    for node in snap.iter() {
        // interval-derived count equals the number of strictly contained nodes
        let contained = snap.iter().filter(|other| node.contains(other)).count() as i64;
        assert_eq!(node.descendant_count(), contained);

        // path length equals the number of strict containers
        let containers = snap.iter().filter(|other| other.contains(node)).count();
        assert_eq!(snap.path(node.id).unwrap().len(), containers);
    }
}

#[test]
fn selectable_list_orders_by_traversal() {
    let snap = snapshot();
    let list = snap.selectable_list("--");
    assert_eq!(list.len(), snap.len());

    let labels: Vec<&str> = list.iter().map(|(_, label)| label.as_str()).collect();
    // b was inserted before c and d anchors after b; traversal order follows lft
    assert_eq!(labels, ["a", "--b", "----d", "--c", "e"]);
}

#[test]
fn full_tree_matches_flat_counts() {
    let snap = snapshot();
    let forest = snap.tree();

    fn count(nodes: &[nestedset_core::TreeNode]) -> usize {
        nodes.iter().map(|n| 1 + count(&n.children)).sum()
    }
    assert_eq!(count(&forest), snap.len());

    let a = &forest[0];
    assert_eq!(a.node.label, "a");
    assert_eq!(a.children.len(), 2);
    assert_eq!(a.children[0].node.label, "b");
    assert_eq!(a.children[0].children[0].node.label, "d");

    let subtree = snap.subtree(NodeId(2)).unwrap();
    assert_eq!(count(&[subtree]), 2);
}

#[test]
fn empty_snapshot_behaves() {
    let snap = TreeSnapshot::capture(&MemoryNodeStore::new()).unwrap();
    assert!(snap.is_empty());
    assert!(snap.roots().is_empty());
    assert!(snap.last_root().is_none());
    assert!(snap.tree().is_empty());
    assert!(snap.selectable_list("-").is_empty());
    snap.validate().unwrap();
}
