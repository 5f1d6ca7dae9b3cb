#[cfg(feature = "serde")]
#[test]
fn tree_export_json_roundtrips() {
    use nestedset_core::{insert_node, MemoryNodeStore, NodeId, TreeNode, TreeSnapshot};

    let mut store = MemoryNodeStore::new();
    insert_node(&mut store, NodeId(1), None, "root").unwrap();
    insert_node(&mut store, NodeId(2), Some(NodeId(1)), "child").unwrap();

    let forest = TreeSnapshot::capture(&store).unwrap().tree();
    let json = serde_json::to_string(&forest).expect("serialize forest");
    assert!(
        json.contains("\"children\"") && json.contains("\"label\""),
        "expected nested children lists in the export, got: {json}"
    );

    let roundtrip: Vec<TreeNode> = serde_json::from_str(&json).expect("deserialize forest");
    assert_eq!(roundtrip, forest);
}
