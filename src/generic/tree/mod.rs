use crate::{
	generic::{
		node::{Address, Item, Node},
		M,
	},
	Comparator, Error,
};
use slab::Slab;
use std::fmt;

mod ext;

pub use ext::*;

/// B-Tree sorted by a [`Comparator`].
///
/// Nodes are allocated in a [`Slab`], reducing the cost of node allocations.
/// Every search may call the comparator, hence may fail.
/// A failed search never modifies the tree.
///
/// The tree keeps a revision counter, incremented each time the set of keys changes.
/// Replacing the value of an existing key does not change the revision.
///
/// # Correctness
/// It is a logic error for a key to be modified in such a way that the key's ordering relative
/// to any other key, as determined by the comparator, changes while it is in the tree.
pub struct Tree<K, V> {
	/// Allocated nodes.
	nodes: Slab<Node<K, V>>,

	/// Root node id.
	root: Option<usize>,

	/// Number of items in the tree.
	len: usize,

	/// Structural revision.
	revision: u64,

	comparator: Comparator<K>,
}

impl<K, V> Tree<K, V> {
	/// Create a new empty B-tree.
	pub fn new(comparator: Comparator<K>) -> Tree<K, V> {
		assert!(M >= 4);
		Tree {
			nodes: Slab::new(),
			root: None,
			len: 0,
			revision: 0,
			comparator,
		}
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn revision(&self) -> u64 {
		self.revision
	}

	#[inline]
	pub fn comparator(&self) -> &Comparator<K> {
		&self.comparator
	}

	/// Returns the value corresponding to the key.
	#[inline]
	pub fn get(&self, key: &K) -> Result<Option<&V>, Error> {
		Ok(self.get_key_value(key)?.map(|(_, v)| v))
	}

	/// Returns the key-value pair corresponding to the supplied key.
	///
	/// The returned key is the one stored in the tree,
	/// which may differ from `key` when ordered by a key function.
	pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>, Error> {
		match self.address_of(key)? {
			Ok(addr) => Ok(self.item(addr).map(Item::as_pair)),
			Err(_) => Ok(None),
		}
	}

	#[inline]
	pub fn contains_key(&self, key: &K) -> Result<bool, Error> {
		Ok(self.address_of(key)?.is_ok())
	}

	/// Returns the first key-value pair in the tree.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		let addr = self.first_item_address()?;
		self.item(addr).map(Item::as_pair)
	}

	/// Returns the last key-value pair in the tree.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		let addr = self.last_item_address()?;
		self.item(addr).map(Item::as_pair)
	}

	#[inline]
	pub fn iter(&self) -> Iter<K, V> {
		Iter::new(self)
	}

	/// Insert a key-value pair in the tree.
	///
	/// If the key is already present, the value is replaced and the old one returned.
	/// The stored key is kept.
	#[inline]
	pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
		let addr = self.address_of(&key)?;
		Ok(self.insert_at(addr, key, value))
	}

	/// Insert a key-value pair at an address previously returned by [`TreeExt::address_of`].
	///
	/// The tree must not have been modified since the address was computed.
	#[inline]
	pub fn insert_at(&mut self, addr: Result<Address, Address>, key: K, value: V) -> Option<V> {
		match addr {
			Ok(addr) => Some(self.replace_value_at(addr, value)),
			Err(addr) => {
				self.insert_exactly_at(addr, Item::new(key, value));
				None
			}
		}
	}

	/// Removes a key from the tree, returning the stored key and value if the key
	/// was previously in the tree.
	#[inline]
	pub fn remove(&mut self, key: &K) -> Result<Option<(K, V)>, Error> {
		match self.address_of(key)? {
			Ok(addr) => Ok(Some(self.remove_at(addr).into_pair())),
			Err(_) => Ok(None),
		}
	}

	/// Removes and returns the first element in the tree.
	pub fn pop_first(&mut self) -> Option<(K, V)> {
		let addr = self.first_item_address()?;
		Some(self.remove_at(addr).into_pair())
	}

	/// Removes and returns the last element in the tree.
	pub fn pop_last(&mut self) -> Option<(K, V)> {
		let addr = self.last_item_address()?;
		Some(self.remove_at(addr).into_pair())
	}

	/// Clears the tree, removing all elements.
	///
	/// The removed nodes are returned rather than dropped,
	/// so the caller decides when keys and values are released.
	pub fn clear(&mut self) -> Slab<Node<K, V>> {
		if !self.is_empty() {
			self.revision += 1
		}

		self.root = None;
		self.len = 0;
		std::mem::take(&mut self.nodes)
	}

	/// Replace the content of this tree by the content of `other`.
	///
	/// The comparator of `self` is kept: both comparators must agree.
	/// Counts as a single structural change when `other` is not empty.
	/// The previous nodes are returned, as in [`Tree::clear`].
	pub fn assign(&mut self, other: Tree<K, V>) -> Slab<Node<K, V>> {
		let changed = !self.is_empty() || !other.is_empty();
		let old = std::mem::replace(&mut self.nodes, other.nodes);
		self.root = other.root;
		self.len = other.len;
		if changed {
			self.revision += 1
		}

		old
	}

	/// Copy of the tree, with the same comparator and a fresh revision counter.
	pub fn duplicate(&self) -> Tree<K, V>
	where
		K: Clone,
		V: Clone,
	{
		Tree {
			nodes: self.nodes.clone(),
			root: self.root,
			len: self.len,
			revision: 0,
			comparator: self.comparator.clone(),
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

/// Borrowing iterator over the items of a [`Tree`], in key order.
pub struct Iter<'a, K, V> {
	/// The tree reference.
	tree: &'a Tree<K, V>,

	/// Address of the next item.
	addr: Option<Address>,

	/// Address of the last item returned from the back.
	end: Option<Address>,

	len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
	pub fn new(tree: &'a Tree<K, V>) -> Self {
		Iter {
			tree,
			addr: tree.first_item_address(),
			end: None,
			len: tree.len(),
		}
	}
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len, Some(self.len))
	}

	fn next(&mut self) -> Option<(&'a K, &'a V)> {
		if self.len == 0 {
			return None;
		}

		let addr = self.addr?;
		self.len -= 1;

		let item = self.tree.item(addr)?;
		self.addr = self.tree.next_item_address(addr);
		Some(item.as_pair())
	}
}

impl<'a, K, V> std::iter::FusedIterator for Iter<'a, K, V> {}
impl<'a, K, V> std::iter::ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> std::iter::DoubleEndedIterator for Iter<'a, K, V> {
	fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
		if self.len == 0 {
			return None;
		}

		let addr = match self.end {
			Some(addr) => self.tree.previous_item_address(addr)?,
			None => self.tree.last_item_address()?,
		};

		self.len -= 1;

		let item = self.tree.item(addr)?;
		self.end = Some(addr);
		Some(item.as_pair())
	}
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
	type IntoIter = Iter<'a, K, V>;
	type Item = (&'a K, &'a V);

	fn into_iter(self) -> Iter<'a, K, V> {
		self.iter()
	}
}
