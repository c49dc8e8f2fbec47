//! Revision-checked iterators.
//!
//! Iterators share the storage of the map they traverse.
//! Each one records the map revision when it is created.
//! If the set of keys changes afterward, the next call to `next`
//! returns [`Error::ConcurrentModification`], and every following call returns `None`.
//! Replacing the value of an existing key does not invalidate iterators.
use crate::{
	generic::{node::Address, node::Item, Tree, TreeExt},
	Error,
};
use std::{cell::RefCell, iter::FusedIterator, rc::Rc};

/// Traversal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Smallest key first.
	Ascending,

	/// Greatest key first.
	Descending,
}

/// Iterator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
	/// No item has been requested yet.
	Created,

	/// At least one item has been returned.
	Active,

	/// The end of the map has been reached.
	Exhausted,

	/// The map has been structurally modified.
	Invalidated,
}

struct Cursor<K, V> {
	tree: Rc<RefCell<Tree<K, V>>>,
	revision: u64,
	direction: Direction,
	state: State,
	next: Option<Address>,
}

impl<K, V> Cursor<K, V> {
	fn new(tree: Rc<RefCell<Tree<K, V>>>, direction: Direction) -> Self {
		let revision = tree.borrow().revision();
		Cursor {
			tree,
			revision,
			direction,
			state: State::Created,
			next: None,
		}
	}

	fn advance<T, F>(&mut self, f: F) -> Option<Result<T, Error>>
	where
		F: FnOnce(&Item<K, V>) -> T,
	{
		if matches!(self.state, State::Exhausted | State::Invalidated) {
			return None;
		}

		let tree = self.tree.borrow();
		if tree.revision() != self.revision {
			tracing::debug!(
				expected = self.revision,
				found = tree.revision(),
				"sorted map iterator invalidated"
			);
			self.state = State::Invalidated;
			return Some(Err(Error::ConcurrentModification));
		}

		let addr = match self.state {
			State::Created => match self.direction {
				Direction::Ascending => tree.first_item_address(),
				Direction::Descending => tree.last_item_address(),
			},
			_ => self.next,
		};

		match addr.and_then(|addr| tree.item(addr).map(|item| (addr, item))) {
			Some((addr, item)) => {
				let value = f(item);
				self.next = match self.direction {
					Direction::Ascending => tree.next_item_address(addr),
					Direction::Descending => tree.previous_item_address(addr),
				};
				self.state = State::Active;
				Some(Ok(value))
			}
			None => {
				self.state = State::Exhausted;
				None
			}
		}
	}
}

macro_rules! checked_iterator {
	($(#[$doc:meta])* $name:ident, $item:ty, |$it:ident| $project:expr) => {
		$(#[$doc])*
		pub struct $name<K, V> {
			cursor: Cursor<K, V>,
		}

		impl<K, V> $name<K, V> {
			pub(crate) fn new(tree: Rc<RefCell<Tree<K, V>>>, direction: Direction) -> Self {
				$name {
					cursor: Cursor::new(tree, direction),
				}
			}

			/// Map revision captured when the iterator was created.
			#[inline]
			pub fn revision(&self) -> u64 {
				self.cursor.revision
			}

			#[inline]
			pub fn direction(&self) -> Direction {
				self.cursor.direction
			}

			#[inline]
			pub fn state(&self) -> State {
				self.cursor.state
			}
		}

		impl<K: Clone, V: Clone> Iterator for $name<K, V> {
			type Item = Result<$item, Error>;

			fn next(&mut self) -> Option<Self::Item> {
				self.cursor.advance(|$it| $project)
			}
		}

		impl<K: Clone, V: Clone> FusedIterator for $name<K, V> {}
	};
}

checked_iterator!(
	/// Iterator over the entries of a [`SortedMap`](crate::SortedMap).
	Iter,
	(K, V),
	|item| (item.key().clone(), item.value().clone())
);

checked_iterator!(
	/// Iterator over the keys of a [`SortedMap`](crate::SortedMap).
	Keys,
	K,
	|item| item.key().clone()
);

checked_iterator!(
	/// Iterator over the values of a [`SortedMap`](crate::SortedMap).
	Values,
	V,
	|item| item.value().clone()
);
