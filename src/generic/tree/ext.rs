use crate::{
	generic::{
		node::{Address, Balance, Internal, Item, Leaf, Node, Side},
		Tree, M,
	},
	Error,
};
use smallvec::SmallVec;

/// Extended API.
///
/// This trait can be imported to access the internal functions of the B-Tree.
/// Navigation functions only accept occupied addresses (see [`Address`]).
pub trait TreeExt<K, V> {
	/// Get the root node id.
	///
	/// Returns `None` if the tree is empty.
	fn root_id(&self) -> Option<usize>;

	fn node(&self, id: usize) -> &Node<K, V>;

	fn item(&self, addr: Address) -> Option<&Item<K, V>>;

	/// Get the address of the first item of the tree, if any.
	fn first_item_address(&self) -> Option<Address>;

	/// Get the address of the last item of the tree, if any.
	fn last_item_address(&self) -> Option<Address>;

	/// Get the address of the item located after this address, if any.
	fn next_item_address(&self, addr: Address) -> Option<Address>;

	/// Get the address of the item located before this address, if any.
	fn previous_item_address(&self, addr: Address) -> Option<Address>;

	/// Search for the given key.
	///
	/// Returns `Ok(Ok(addr))` with the occupied address of the matching item,
	/// or `Ok(Err(addr))` with the vacant address where the key would be inserted.
	/// Comparator failures are returned as `Err`.
	fn address_of(&self, key: &K) -> Result<Result<Address, Address>, Error>;

	/// Search for the given key in the subtree rooted in `id`.
	fn address_in(&self, id: usize, key: &K) -> Result<Result<Address, Address>, Error>;

	/// Checks the B-Tree invariants.
	///
	/// Panics if the tree is malformed.
	/// Returns an error only if the comparator fails.
	fn validate(&self) -> Result<(), Error>;

	/// Validate the given node and returns the depth of the node.
	fn validate_node(&self, id: usize, parent: Option<usize>, min: Option<&K>, max: Option<&K>) -> Result<usize, Error>;
}

/// Extended mutable API.
///
/// None of these functions call the comparator.
pub trait TreeExtMut<K, V> {
	/// Insert an item at the given vacant address.
	///
	/// ## Correctness
	/// It is assumed that it is btree-correct to insert the given item at the given address.
	fn insert_exactly_at(&mut self, addr: Address, item: Item<K, V>);

	/// Replace the value of the item at the given occupied address.
	fn replace_value_at(&mut self, addr: Address, value: V) -> V;

	/// Remove the item at the given occupied address.
	///
	/// All addresses are to be considered invalid afterward.
	fn remove_at(&mut self, addr: Address) -> Item<K, V>;
}

impl<K, V> TreeExt<K, V> for Tree<K, V> {
	#[inline]
	fn root_id(&self) -> Option<usize> {
		self.root
	}

	#[inline]
	fn node(&self, id: usize) -> &Node<K, V> {
		&self.nodes[id]
	}

	#[inline]
	fn item(&self, addr: Address) -> Option<&Item<K, V>> {
		self.nodes.get(addr.id)?.item(addr.offset)
	}

	fn first_item_address(&self) -> Option<Address> {
		Some(Address::new(self.leftmost_leaf_of(self.root?), 0))
	}

	fn last_item_address(&self) -> Option<Address> {
		let id = self.rightmost_leaf_of(self.root?);
		Some(Address::new(id, self.node(id).item_count() - 1))
	}

	fn next_item_address(&self, addr: Address) -> Option<Address> {
		if addr.is_nowhere() {
			return None;
		}

		// leftmost item of the right subtree, if any.
		if let Some(child_id) = self.node(addr.id).child_id_opt(addr.offset + 1) {
			return Some(Address::new(self.leftmost_leaf_of(child_id), 0));
		}

		let mut addr = Address::new(addr.id, addr.offset + 1);
		loop {
			let node = self.node(addr.id);

			if addr.offset < node.item_count() {
				return Some(addr);
			}

			let parent_id = node.parent()?;
			addr.offset = self.node(parent_id).child_index(addr.id).unwrap();
			addr.id = parent_id;
		}
	}

	fn previous_item_address(&self, addr: Address) -> Option<Address> {
		if addr.is_nowhere() {
			return None;
		}

		// rightmost item of the left subtree, if any.
		if let Some(child_id) = self.node(addr.id).child_id_opt(addr.offset) {
			let id = self.rightmost_leaf_of(child_id);
			return Some(Address::new(id, self.node(id).item_count() - 1));
		}

		let mut addr = addr;
		loop {
			if addr.offset > 0 {
				addr.offset -= 1;
				return Some(addr);
			}

			let parent_id = self.node(addr.id).parent()?;
			addr.offset = self.node(parent_id).child_index(addr.id).unwrap();
			addr.id = parent_id;
		}
	}

	fn address_of(&self, key: &K) -> Result<Result<Address, Address>, Error> {
		match self.root {
			Some(id) => self.address_in(id, key),
			None => Ok(Err(Address::nowhere())),
		}
	}

	fn address_in(&self, mut id: usize, key: &K) -> Result<Result<Address, Address>, Error> {
		loop {
			match self.node(id).offset_of(&self.comparator, key)? {
				Ok(offset) => return Ok(Ok(Address { id, offset })),
				Err((offset, None)) => return Ok(Err(Address::new(id, offset))),
				Err((_, Some(child_id))) => id = child_id,
			}
		}
	}

	fn validate(&self) -> Result<(), Error> {
		match self.root {
			Some(id) => {
				self.validate_node(id, None, None, None)?;
			}
			None => {
				if self.len != 0 || !self.nodes.is_empty() {
					panic!("empty tree has items")
				}
			}
		}

		let count = self.iter().count();
		if count != self.len {
			panic!("tree length is {} but {} items are reachable", self.len, count)
		}

		Ok(())
	}

	fn validate_node(&self, id: usize, parent: Option<usize>, min: Option<&K>, max: Option<&K>) -> Result<usize, Error> {
		let node = self.node(id);
		node.validate(&self.comparator, parent, min, max)?;

		let mut depth = None;
		for (i, child_id) in node.children().enumerate() {
			let (child_min, child_max) = node.separators(i);
			let child_min = child_min.or(min);
			let child_max = child_max.or(max);

			let child_depth = self.validate_node(child_id, Some(id), child_min, child_max)?;
			match depth {
				None => depth = Some(child_depth),
				Some(depth) => {
					if depth != child_depth {
						panic!("tree not balanced")
					}
				}
			}
		}

		match depth {
			Some(depth) => Ok(depth + 1),
			None => Ok(0),
		}
	}
}

impl<K, V> TreeExtMut<K, V> for Tree<K, V> {
	fn insert_exactly_at(&mut self, addr: Address, item: Item<K, V>) {
		if addr.is_nowhere() {
			if !self.is_empty() {
				panic!("invalid item address")
			}

			let id = self.nodes.insert(Node::Leaf(Leaf::new(None, item)));
			self.root = Some(id);
		} else {
			if self.is_empty() {
				panic!("invalid item address")
			}

			self.nodes[addr.id].insert(addr.offset, item, None);
			self.rebalance(addr.id);
		}

		self.len += 1;
		self.revision += 1;
	}

	#[inline]
	fn replace_value_at(&mut self, addr: Address, value: V) -> V {
		self.nodes[addr.id].item_mut(addr.offset).unwrap().set_value(value)
	}

	fn remove_at(&mut self, addr: Address) -> Item<K, V> {
		self.len -= 1;
		self.revision += 1;

		match self.nodes[addr.id].child_id_opt(addr.offset) {
			None => {
				let item = match &mut self.nodes[addr.id] {
					Node::Leaf(leaf) => leaf.remove(addr.offset),
					Node::Internal(_) => unreachable!("internal nodes have children"),
				};

				self.rebalance(addr.id);
				item
			}
			Some(left_child_id) => {
				// the item is replaced by its predecessor, taken from a leaf.
				let leaf_id = self.rightmost_leaf_of(left_child_id);
				let (predecessor, _) = self.nodes[leaf_id].take(Side::Back).unwrap();
				let item = std::mem::replace(self.nodes[addr.id].item_mut(addr.offset).unwrap(), predecessor);
				self.rebalance(leaf_id);
				item
			}
		}
	}
}

impl<K, V> Tree<K, V> {
	fn leftmost_leaf_of(&self, mut id: usize) -> usize {
		while let Some(child_id) = self.node(id).child_id_opt(0) {
			id = child_id
		}

		id
	}

	fn rightmost_leaf_of(&self, mut id: usize) -> usize {
		loop {
			let node = self.node(id);
			match node.child_id_opt(node.item_count()) {
				Some(child_id) => id = child_id,
				None => return id,
			}
		}
	}

	/// Allocate a node and adopt its children.
	fn allocate_node(&mut self, node: Node<K, V>) -> usize {
		let children: SmallVec<[usize; M + 1]> = node.children().collect();
		let id = self.nodes.insert(node);

		for child_id in children {
			self.nodes[child_id].set_parent(Some(id))
		}

		id
	}

	/// Restore the balance of node `id` and of its ancestors.
	fn rebalance(&mut self, mut id: usize) {
		loop {
			match self.node(id).balance() {
				Balance::Balanced => break,
				Balance::Overflow => {
					let (median, right) = self.nodes[id].split();
					let right_id = self.allocate_node(right);

					match self.node(id).parent() {
						Some(parent_id) => {
							let parent = &mut self.nodes[parent_id];
							let offset = parent.child_index(id).unwrap();
							parent.insert(offset, median, Some(right_id));
							id = parent_id
						}
						None => {
							let root = Node::Internal(Internal::binary(None, id, median, right_id));
							let root_id = self.allocate_node(root);
							self.root = Some(root_id);
							tracing::trace!(root = root_id, "tree root split");
							break;
						}
					}
				}
				Balance::Underflow(is_empty) => match self.node(id).parent() {
					Some(parent_id) => {
						let index = self.node(parent_id).child_index(id).unwrap();
						if self.try_rotate(parent_id, index, Side::Back) || self.try_rotate(parent_id, index, Side::Front) {
							break;
						}

						// both siblings are small enough to be merged with this child.
						self.merge_children(parent_id, index);
						id = parent_id
					}
					None => {
						if is_empty {
							self.root = self.node(id).child_id_opt(0);

							if let Some(root_id) = self.root {
								self.nodes[root_id].set_parent(None);
							}

							self.nodes.remove(id);
							tracing::trace!(root = ?self.root, "tree root collapsed");
						}

						break;
					}
				},
			}
		}
	}

	/// Refill the child `index` of node `id` with one item of its sibling on the given side.
	///
	/// The item goes up into the parent, and the separator comes down into the child.
	/// Returns `false` if there is no such sibling, or if it cannot lend an item.
	fn try_rotate(&mut self, id: usize, index: usize, sibling: Side) -> bool {
		let (sibling_index, separator_offset) = match sibling {
			Side::Front => match index.checked_sub(1) {
				Some(i) => (i, i),
				None => return false,
			},
			Side::Back => (index + 1, index),
		};

		let parent = self.node(id);
		let (child_id, sibling_id) = match (parent.child_id_opt(index), parent.child_id_opt(sibling_index)) {
			(Some(child_id), Some(sibling_id)) => (child_id, sibling_id),
			_ => return false,
		};

		if !self.node(sibling_id).can_lend() {
			return false;
		}

		let (item, outer) = self.nodes[sibling_id].take(sibling.opposite()).unwrap();
		let separator = std::mem::replace(self.nodes[id].item_mut(separator_offset).unwrap(), item);
		self.nodes[child_id].put(sibling, separator, outer);

		if let Some(outer) = outer {
			self.nodes[outer].set_parent(Some(child_id))
		}

		true
	}

	/// Merge the child `index` of node `id` with one of its siblings.
	fn merge_children(&mut self, id: usize, index: usize) {
		let (left_id, right_id, separator) = match &mut self.nodes[id] {
			Node::Internal(node) => node.remove_separator(index.saturating_sub(1)),
			Node::Leaf(_) => unreachable!("leaves have no children"),
		};

		let right = self.nodes.remove(right_id);
		for child_id in right.children() {
			self.nodes[child_id].set_parent(Some(left_id));
		}

		self.nodes[left_id].append(separator, right);
	}
}
