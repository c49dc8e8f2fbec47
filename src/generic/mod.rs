//! Generic B-Tree types.
//!
//! The tree defined here owns its nodes and is used directly by value.
//! [`SortedMap`](crate::SortedMap) wraps it in a shared cell.
pub mod node;
pub use node::Node;

pub mod tree;
pub use tree::{Iter, Tree, TreeExt, TreeExtMut};

/// Knuth order of the B-Trees.
///
/// Must be at least 4.
pub const M: usize = 8;
