use crate::{
	generic::{node::Item, M},
	utils::binary_search_min,
	Comparator, Error,
};
use smallvec::SmallVec;

/// Node without children.
#[derive(Clone)]
pub struct Leaf<K, V> {
	pub(super) parent: Option<usize>,
	pub(super) items: SmallVec<[Item<K, V>; M + 1]>,
}

impl<K, V> Leaf<K, V> {
	#[inline]
	pub fn new(parent: Option<usize>, item: Item<K, V>) -> Leaf<K, V> {
		let mut items = SmallVec::new();
		items.push(item);
		Leaf { parent, items }
	}

	/// Search `key` in the leaf.
	///
	/// On failure, returns the offset where the key would be inserted.
	#[inline]
	pub fn offset_of(&self, comparator: &Comparator<K>, key: &K) -> Result<Result<usize, usize>, Error> {
		Ok(match binary_search_min(comparator, &self.items, key)? {
			Some((i, true)) => Ok(i),
			Some((i, false)) => Err(i + 1),
			None => Err(0),
		})
	}

	#[inline]
	pub fn remove(&mut self, offset: usize) -> Item<K, V> {
		self.items.remove(offset)
	}
}
