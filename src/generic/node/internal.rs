use crate::{
	generic::{
		node::{Children, Item, Keyed},
		M,
	},
	utils::binary_search_min,
	Comparator, Error,
};
use smallvec::SmallVec;

/// Item of an internal node, with the child on its right.
#[derive(Clone)]
pub struct Branch<K, V> {
	pub item: Item<K, V>,
	pub child: usize,
}

impl<K, V> Keyed for Branch<K, V> {
	type Key = K;

	#[inline]
	fn key(&self) -> &K {
		self.item.key()
	}
}

/// Node with children.
///
/// An internal node with `n` items has `n + 1` children:
/// `first_child`, then the child of each branch.
#[derive(Clone)]
pub struct Internal<K, V> {
	pub(super) parent: Option<usize>,
	pub(super) first_child: usize,
	pub(super) branches: SmallVec<[Branch<K, V>; M]>,
}

impl<K, V> Internal<K, V> {
	/// Node with a single item between two children.
	#[inline]
	pub fn binary(parent: Option<usize>, left_id: usize, median: Item<K, V>, right_id: usize) -> Internal<K, V> {
		let mut branches = SmallVec::new();
		branches.push(Branch {
			item: median,
			child: right_id,
		});

		Internal {
			parent,
			first_child: left_id,
			branches,
		}
	}

	#[inline]
	pub fn child_id_opt(&self, index: usize) -> Option<usize> {
		match index {
			0 => Some(self.first_child),
			_ => self.branches.get(index - 1).map(|b| b.child),
		}
	}

	#[inline]
	pub fn child_index(&self, id: usize) -> Option<usize> {
		if self.first_child == id {
			return Some(0);
		}

		self.branches.iter().position(|b| b.child == id).map(|i| i + 1)
	}

	/// Search `key` in the node.
	///
	/// On failure, returns the index and id of the child whose subtree may contain the key.
	#[inline]
	pub fn offset_of(&self, comparator: &Comparator<K>, key: &K) -> Result<Result<usize, (usize, usize)>, Error> {
		Ok(match binary_search_min(comparator, &self.branches, key)? {
			Some((offset, true)) => Ok(offset),
			Some((offset, false)) => Err((offset + 1, self.branches[offset].child)),
			None => Err((0, self.first_child)),
		})
	}

	#[inline]
	pub fn children(&self) -> Children<K, V> {
		Children::Internal(Some(self.first_child), self.branches.iter())
	}

	/// Remove the separator between the children `index` and `index + 1`.
	///
	/// Returns the ids of both children with the separator.
	pub fn remove_separator(&mut self, index: usize) -> (usize, usize, Item<K, V>) {
		let left_id = match index {
			0 => self.first_child,
			_ => self.branches[index - 1].child,
		};
		let Branch { item, child } = self.branches.remove(index);
		(left_id, child, item)
	}

	/// Keys bounding the subtree of the child `index`.
	#[inline]
	pub fn separators(&self, index: usize) -> (Option<&K>, Option<&K>) {
		let min = index.checked_sub(1).map(|i| self.branches[i].key());
		let max = self.branches.get(index).map(Keyed::key);
		(min, max)
	}
}
