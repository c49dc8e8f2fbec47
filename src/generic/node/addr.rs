use std::fmt;

/// Item location in a [`Tree`](crate::generic::Tree).
///
/// Each item in a B-Tree is addressed by a node identifier and an offset in the node.
/// We write `@id:offset` the address of the item contained in the node `id` at offset `offset`.
///
/// ```text
///                                   ┌────────────────┐
///                                   │ node 0      ┌──┼─── this item address is `@0:1`
///                                   │┌────────┐ ┌─v─┐│
///                        ┌───────── ││ item 0 │ │ 1 ││ ──────────┐
///                        │          │└────────┘ └───┘│           │
///                        │          └────────────────┘           │
///                        │                   │                   │
///               ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
///               │ node 1          │ │ node 2          │ │ node 3          │
///               │┌───┐ ┌───┐ ┌───┐│ │┌───┐ ┌───┐ ┌───┐│ │┌───┐ ┌───┐ ┌───┐│
///               ││ 0 │ │ 1 │ │ 2 ││ ││ 0 │ │ 1 │ │ 2 ││ ││ 0 │ │ 1 │ │ 2 ││
///               │└─^─┘ └───┘ └───┘│ │└───┘ └───┘ └─^─┘│ │└───┘ └───┘ └───┘│
///               └──┼──────────────┘ └──────────────┼──┘ └─────────────────┘
///                  └─ this item address is `@1:0`  └─ this item address is `@2:2`
/// ```
///
/// ## Validity
///
/// An address is *occupied* if it points to an actual item.
/// An address returned by a failed key search is *vacant*: it designates the
/// position, in a leaf, where the searched key would be inserted.
/// Its offset may then be equal to the number of items in the leaf.
/// The only vacant address of an empty tree is [`Address::nowhere`].
///
/// Addresses are only meaningful as long as the tree is not structurally modified
/// (see [`Tree::revision`](crate::generic::Tree::revision)).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Address {
	/// Identifier of the node.
	pub id: usize,

	/// Offset in the node.
	pub offset: usize,
}

impl Address {
	#[inline]
	pub fn new(id: usize, offset: usize) -> Address {
		Address { id, offset }
	}

	#[inline]
	pub fn nowhere() -> Address {
		Address {
			id: usize::MAX,
			offset: 0,
		}
	}

	#[inline]
	pub fn is_nowhere(&self) -> bool {
		self.id == usize::MAX
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "@{}:{}", self.id, self.offset)
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "@{}:{}", self.id, self.offset)
	}
}
