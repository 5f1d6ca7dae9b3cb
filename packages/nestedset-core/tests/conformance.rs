use nestedset_core::MemoryNodeStore;

#[test]
fn memory_store_passes_the_conformance_suite() {
    nestedset_test_support::check_node_store(MemoryNodeStore::new);
}
