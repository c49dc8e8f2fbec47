//! B-Tree nodes.
//!
//! Nodes live in the slab of their [`Tree`](crate::generic::Tree)
//! and refer to their parent and children by slab index.
use crate::{generic::M, Comparator, Error};
use smallvec::{Array, SmallVec};

mod addr;
mod internal;
mod item;
mod leaf;

pub use addr::Address;
pub use internal::{Branch, Internal};
pub use item::Item;
pub use leaf::Leaf;

/// Minimum number of items in a non-root node.
pub const MIN_ITEMS: usize = M / 2 - 1;

/// Type identified by a key.
///
/// This is implemented by [`Item`] and [`Branch`].
pub trait Keyed {
	type Key;

	fn key(&self) -> &Self::Key;
}

/// Node balance.
#[derive(Debug)]
pub enum Balance {
	/// The node is balanced.
	Balanced,

	/// The node is overflowing.
	Overflow,

	/// The node is underflowing.
	///
	/// The boolean is `true` if the node is empty.
	Underflow(bool),
}

/// End of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Front,
	Back,
}

impl Side {
	#[inline]
	pub fn opposite(self) -> Side {
		match self {
			Side::Front => Side::Back,
			Side::Back => Side::Front,
		}
	}
}

/// Result of a key search in a single node.
///
/// `Ok(offset)` if the key is found in the node.
/// Otherwise `Err((offset, child))`, where `offset` is the insertion offset
/// and `child` the id of the child that may contain the key (`None` for leaves).
pub type NodeSearch = Result<usize, (usize, Option<usize>)>;

/// B-tree node.
#[derive(Clone)]
pub enum Node<K, V> {
	Internal(Internal<K, V>),
	Leaf(Leaf<K, V>),
}

impl<K, V> Node<K, V> {
	#[inline]
	pub fn parent(&self) -> Option<usize> {
		match self {
			Node::Internal(node) => node.parent,
			Node::Leaf(leaf) => leaf.parent,
		}
	}

	#[inline]
	pub fn set_parent(&mut self, parent: Option<usize>) {
		match self {
			Node::Internal(node) => node.parent = parent,
			Node::Leaf(leaf) => leaf.parent = parent,
		}
	}

	#[inline]
	pub fn item_count(&self) -> usize {
		match self {
			Node::Internal(node) => node.branches.len(),
			Node::Leaf(leaf) => leaf.items.len(),
		}
	}

	/// Maximum number of items before the node must be split.
	#[inline]
	fn capacity(&self) -> usize {
		match self {
			Node::Internal(_) => M - 1,
			Node::Leaf(_) => M,
		}
	}

	#[inline]
	pub fn balance(&self) -> Balance {
		let count = self.item_count();
		if count > self.capacity() {
			Balance::Overflow
		} else if count < MIN_ITEMS {
			Balance::Underflow(count == 0)
		} else {
			Balance::Balanced
		}
	}

	/// Checks if an item can be taken from this node without making it underflow.
	#[inline]
	pub fn can_lend(&self) -> bool {
		self.item_count() > MIN_ITEMS
	}

	#[inline]
	pub fn child_id_opt(&self, index: usize) -> Option<usize> {
		match self {
			Node::Internal(node) => node.child_id_opt(index),
			Node::Leaf(_) => None,
		}
	}

	#[inline]
	pub fn child_index(&self, id: usize) -> Option<usize> {
		match self {
			Node::Internal(node) => node.child_index(id),
			Node::Leaf(_) => None,
		}
	}

	#[inline]
	pub fn children(&self) -> Children<K, V> {
		match self {
			Node::Internal(node) => node.children(),
			Node::Leaf(_) => Children::Leaf,
		}
	}

	#[inline]
	pub fn separators(&self, index: usize) -> (Option<&K>, Option<&K>) {
		match self {
			Node::Internal(node) => node.separators(index),
			Node::Leaf(_) => (None, None),
		}
	}

	/// Search `key` in this node only.
	#[inline]
	pub fn offset_of(&self, comparator: &Comparator<K>, key: &K) -> Result<NodeSearch, Error> {
		Ok(match self {
			Node::Internal(node) => node.offset_of(comparator, key)?.map_err(|(index, child_id)| (index, Some(child_id))),
			Node::Leaf(leaf) => leaf.offset_of(comparator, key)?.map_err(|index| (index, None)),
		})
	}

	#[inline]
	pub fn item(&self, offset: usize) -> Option<&Item<K, V>> {
		match self {
			Node::Internal(node) => node.branches.get(offset).map(|b| &b.item),
			Node::Leaf(leaf) => leaf.items.get(offset),
		}
	}

	#[inline]
	pub fn item_mut(&mut self, offset: usize) -> Option<&mut Item<K, V>> {
		match self {
			Node::Internal(node) => node.branches.get_mut(offset).map(|b| &mut b.item),
			Node::Leaf(leaf) => leaf.items.get_mut(offset),
		}
	}

	/// Insert an item at the given offset.
	///
	/// Internal nodes also take the child on the right of the item.
	/// The node may overflow afterward.
	pub fn insert(&mut self, offset: usize, item: Item<K, V>, right_child: Option<usize>) {
		match (self, right_child) {
			(Node::Internal(node), Some(child)) => node.branches.insert(offset, Branch { item, child }),
			(Node::Leaf(leaf), None) => leaf.items.insert(offset, item),
			_ => panic!("node kind does not match the given child"),
		}
	}

	/// Remove the item at the given end of the node, with its outer child.
	pub fn take(&mut self, side: Side) -> Option<(Item<K, V>, Option<usize>)> {
		match self {
			Node::Internal(node) => match side {
				Side::Front if !node.branches.is_empty() => {
					let Branch { item, child } = node.branches.remove(0);
					let outer = std::mem::replace(&mut node.first_child, child);
					Some((item, Some(outer)))
				}
				Side::Front => None,
				Side::Back => node.branches.pop().map(|b| (b.item, Some(b.child))),
			},
			Node::Leaf(leaf) => match side {
				Side::Front if !leaf.items.is_empty() => Some((leaf.items.remove(0), None)),
				Side::Front => None,
				Side::Back => leaf.items.pop().map(|item| (item, None)),
			},
		}
	}

	/// Add an item at the given end of the node, with its outer child.
	pub fn put(&mut self, side: Side, item: Item<K, V>, outer: Option<usize>) {
		match (self, outer) {
			(Node::Internal(node), Some(outer)) => match side {
				Side::Front => {
					let child = std::mem::replace(&mut node.first_child, outer);
					node.branches.insert(0, Branch { item, child })
				}
				Side::Back => node.branches.push(Branch { item, child: outer }),
			},
			(Node::Leaf(leaf), None) => match side {
				Side::Front => leaf.items.insert(0, item),
				Side::Back => leaf.items.push(item),
			},
			_ => panic!("node kind does not match the given child"),
		}
	}

	/// Split an overflowing node in two.
	///
	/// Returns the median item and the right half.
	/// The children of the right half still refer to this node as their parent.
	pub fn split(&mut self) -> (Item<K, V>, Node<K, V>) {
		match self {
			Node::Internal(node) => {
				let (median, branches) = split_at_median(&mut node.branches);
				let right = Internal {
					parent: node.parent,
					first_child: median.child,
					branches,
				};

				(median.item, Node::Internal(right))
			}
			Node::Leaf(leaf) => {
				let (median, items) = split_at_median(&mut leaf.items);
				let right = Leaf {
					parent: leaf.parent,
					items,
				};

				(median, Node::Leaf(right))
			}
		}
	}

	/// Append `separator` then every item of `right`, a node of the same kind.
	pub fn append(&mut self, separator: Item<K, V>, right: Node<K, V>) {
		match (self, right) {
			(Node::Internal(node), Node::Internal(mut right)) => {
				node.branches.push(Branch {
					item: separator,
					child: right.first_child,
				});
				node.branches.append(&mut right.branches)
			}
			(Node::Leaf(leaf), Node::Leaf(mut right)) => {
				leaf.items.push(separator);
				leaf.items.append(&mut right.items)
			}
			_ => panic!("cannot merge nodes of different kinds"),
		}
	}

	/// Checks the node invariants, given its expected parent and the separators around it.
	///
	/// Panics if the node is malformed.
	pub fn validate(&self, comparator: &Comparator<K>, parent: Option<usize>, min: Option<&K>, max: Option<&K>) -> Result<(), Error> {
		if self.parent() != parent {
			panic!("wrong parent")
		}

		if parent.is_some() {
			match self.balance() {
				Balance::Overflow => panic!("node is overflowing"),
				Balance::Underflow(_) => panic!("node is underflowing"),
				Balance::Balanced => (),
			}
		} else if self.item_count() == 0 {
			panic!("root node is empty")
		}

		let keys: SmallVec<[&K; M + 1]> = (0..self.item_count()).filter_map(|i| self.item(i)).map(Item::key).collect();

		for w in keys.windows(2) {
			if !comparator.less(w[0], w[1])? {
				panic!("node items are not sorted")
			}
		}

		if let (Some(min), Some(first)) = (min, keys.first()) {
			if !comparator.less(min, first)? {
				panic!("node item key is not greater than left separator")
			}
		}

		if let (Some(max), Some(last)) = (max, keys.last()) {
			if !comparator.less(last, max)? {
				panic!("node item key is not less than right separator")
			}
		}

		Ok(())
	}
}

/// Split `items` around its median element.
///
/// Returns the median and the elements after it.
fn split_at_median<A: Array>(items: &mut SmallVec<A>) -> (A::Item, SmallVec<A>) {
	let median = (items.len() - 1) / 2;
	let right = items.drain(median + 1..).collect();
	let median = items.pop().unwrap();
	(median, right)
}

/// Children ids of a node.
pub enum Children<'a, K, V> {
	Leaf,
	Internal(Option<usize>, std::slice::Iter<'a, Branch<K, V>>),
}

impl<'a, K, V> Iterator for Children<'a, K, V> {
	type Item = usize;

	#[inline]
	fn next(&mut self) -> Option<usize> {
		match self {
			Children::Leaf => None,
			Children::Internal(first, rest) => match first.take() {
				Some(child) => Some(child),
				None => rest.next().map(|branch| branch.child),
			},
		}
	}
}
