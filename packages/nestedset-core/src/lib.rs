#![forbid(unsafe_code)]
//! Nested-set (Modified Preorder Tree Traversal) maintenance for a forest stored
//! as a flat relation. Each node carries a `(lft, rght)` integer interval; interval
//! containment encodes ancestry. This crate stays independent of concrete storage
//! engines: all reads and bulk updates go through the [`NodeStore`] trait so the
//! algorithms can run against SQL tables, embedded stores, or the in-memory
//! reference implementation.

pub mod allocate;
pub mod error;
pub mod movement;
pub mod node;
pub mod query;
pub mod rebuild;
pub mod remove;
pub mod store;

pub use allocate::{allocate, insert_node, Interval};
pub use error::{Error, Result};
pub use movement::{move_left, move_right};
pub use node::{Node, NodeId};
pub use query::{TreeNode, TreeSnapshot};
pub use rebuild::{rebuild_forest, REBUILD_PAGE_SIZE};
pub use remove::{promote_children, remove_subtree};
pub use store::{BulkUpdate, MemoryNodeStore, NodeStore, Page, RowFilter};
