use crate::{
	generic::{node::Item, Tree, TreeExt, TreeExtMut},
	Comparator, Error, KeyFn, SortedMapFactory,
};
use std::{
	cell::{Ref, RefCell, RefMut},
	fmt,
	rc::Rc,
};

pub mod iter;
pub mod update;
pub mod view;

pub use iter::{Direction, Iter, Keys, State, Values};
pub use update::{AsMapping, EntryShape, IntoEntry, Mapping, Pairs, Source};
pub use view::{ItemsView, KeysView, SetOperand, ValuesView};

/// A map sorted by its keys.
///
/// Keys are sorted either by their natural order ([`Ord`]),
/// or by a key function given at construction (see [`KeyFn`]).
/// Two keys are considered the same when neither is ordered before the other.
///
/// The map is a handle on a shared B-Tree.
/// Views ([`SortedMap::keys`], [`SortedMap::values`], [`SortedMap::items`])
/// and iterators share the same storage,
/// which is why mutating methods only need `&self`.
/// Use [`SortedMap::copy`] to get an independent map.
///
/// Keys and values are cloned out of the map when read.
/// Store [`Rc`]s to share them instead.
///
/// # Basic usage
/// ```
/// use sorted_btree::SortedMap;
///
/// let map = SortedMap::new();
/// map.insert("b", 2).unwrap();
/// map.insert("a", 1).unwrap();
/// map.insert("c", 3).unwrap();
///
/// assert_eq!(map.items().to_vec(), [("a", 1), ("b", 2), ("c", 3)]);
/// assert_eq!(map.pop_item(false).unwrap(), ("c", 3));
/// assert_eq!(map.len(), 2);
/// ```
///
/// # Failures
/// Every operation that compares keys may fail if the key function fails.
/// A failed operation leaves the map unchanged.
/// Mutating a map from its own key function fails with [`Error::Borrowed`].
///
/// # Correctness
/// It is a logic error for a key to be modified in such a way that the key's ordering relative
/// to any other key changes while it is in the map.
pub struct SortedMap<K, V> {
	tree: Rc<RefCell<Tree<K, V>>>,
}

impl<K: Ord, V> SortedMap<K, V> {
	/// Create a new empty map sorted by the natural order of its keys.
	pub fn new() -> Self {
		Self::with_comparator(Comparator::natural())
	}

	/// Build a map sorted by natural order, binding every key to `value`.
	///
	/// Later duplicates overwrite earlier ones.
	pub fn from_keys<I>(keys: I, value: V) -> Result<Self, Error>
	where
		I: IntoIterator<Item = K>,
		V: Clone,
	{
		Self::new().with_keys(keys, value)
	}
}

impl<K: Ord, V> Default for SortedMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> SortedMap<K, V> {
	/// Create a new empty map sorted by the given key function.
	pub fn with_key_fn(key_fn: KeyFn<K>) -> Self {
		Self::with_comparator(Comparator::derived(key_fn))
	}

	pub fn with_comparator(comparator: Comparator<K>) -> Self {
		SortedMap {
			tree: Rc::new(RefCell::new(Tree::new(comparator))),
		}
	}

	/// Factory of maps sorted by the given key function.
	pub fn ordered_by(key_fn: KeyFn<K>) -> SortedMapFactory<K, V> {
		SortedMapFactory::new(key_fn)
	}

	pub(crate) fn with_keys<I>(self, keys: I, value: V) -> Result<Self, Error>
	where
		I: IntoIterator<Item = K>,
		V: Clone,
	{
		for key in keys {
			self.insert(key, value.clone())?;
		}

		Ok(self)
	}

	#[inline]
	fn read(&self) -> Ref<Tree<K, V>> {
		self.tree.borrow()
	}

	/// Borrow the tree to commit a structural change.
	///
	/// No user code (key function, `Clone`, `Drop`) may run while the borrow is held.
	fn write(&self) -> Result<RefMut<Tree<K, V>>, Error> {
		self.tree.try_borrow_mut().map_err(|_| {
			tracing::debug!("sorted map mutation refused: the map is in use");
			Error::Borrowed
		})
	}

	#[inline]
	fn shares_storage_with(&self, other: &SortedMap<K, V>) -> bool {
		Rc::ptr_eq(&self.tree, &other.tree)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.read().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	/// Structural revision of the map.
	///
	/// Incremented each time a key is added or removed,
	/// and when a non-empty map is cleared.
	#[inline]
	pub fn revision(&self) -> u64 {
		self.read().revision()
	}

	pub fn comparator(&self) -> Comparator<K> {
		self.read().comparator().clone()
	}

	pub fn key_fn(&self) -> Option<KeyFn<K>> {
		self.read().comparator().key_fn().cloned()
	}

	/// Insert a key-value pair in the map.
	///
	/// If an equivalent key is already present, its value is replaced
	/// and the previous value returned. The stored key is kept.
	pub fn insert(&self, key: K, value: V) -> Result<Option<V>, Error> {
		let addr = self.read().address_of(&key)?;
		match addr {
			Ok(addr) => {
				let replaced = self.write()?.replace_value_at(addr, value);
				Ok(Some(replaced))
			}
			Err(addr) => {
				self.write()?.insert_exactly_at(addr, Item::new(key, value));
				Ok(None)
			}
		}
	}

	/// Returns the entry matching `key`.
	pub fn find(&self, key: &K) -> Result<Option<(K, V)>, Error>
	where
		K: Clone,
		V: Clone,
	{
		Ok(self.read().get_key_value(key)?.map(|(k, v)| (k.clone(), v.clone())))
	}

	/// Returns the value bound to `key`, if any.
	pub fn get(&self, key: &K) -> Result<Option<V>, Error>
	where
		V: Clone,
	{
		Ok(self.read().get(key)?.cloned())
	}

	/// Returns the value bound to `key`, or `default`.
	pub fn get_or(&self, key: &K, default: V) -> Result<V, Error>
	where
		V: Clone,
	{
		Ok(self.get(key)?.unwrap_or(default))
	}

	/// Returns the value bound to `key`.
	///
	/// Fails with [`Error::KeyNotFound`] if the key is absent.
	pub fn fetch(&self, key: &K) -> Result<V, Error>
	where
		V: Clone,
	{
		self.get(key)?.ok_or(Error::KeyNotFound)
	}

	pub fn contains_key(&self, key: &K) -> Result<bool, Error> {
		self.read().contains_key(key)
	}

	/// Returns the value bound to `key`,
	/// binding it to `default` first if the key is absent.
	pub fn get_or_insert(&self, key: K, default: V) -> Result<V, Error>
	where
		V: Clone,
	{
		// cloned first: no user code may run between the search and the insertion.
		let value = default.clone();

		let addr = {
			let tree = self.read();
			match tree.address_of(&key)? {
				Ok(addr) => return Ok(tree.item(addr).map(|item| item.value().clone()).unwrap_or(value)),
				Err(addr) => addr,
			}
		};

		self.write()?.insert_exactly_at(addr, Item::new(key, default));
		Ok(value)
	}

	pub fn get_or_insert_default(&self, key: K) -> Result<V, Error>
	where
		V: Clone + Default,
	{
		self.get_or_insert(key, V::default())
	}

	/// Removes `key` from the map, returning its value if it was present.
	pub fn remove(&self, key: &K) -> Result<Option<V>, Error> {
		let addr = match self.read().address_of(key)? {
			Ok(addr) => addr,
			Err(_) => return Ok(None),
		};

		let item = self.write()?.remove_at(addr);
		Ok(Some(item.into_value()))
	}

	/// Removes `key` from the map and returns its value.
	///
	/// Fails with [`Error::KeyNotFound`] if the key is absent.
	pub fn pop(&self, key: &K) -> Result<V, Error> {
		self.remove(key)?.ok_or(Error::KeyNotFound)
	}

	/// Removes `key` from the map and returns its value, or `default` if the key is absent.
	pub fn pop_or(&self, key: &K, default: V) -> Result<V, Error> {
		Ok(self.remove(key)?.unwrap_or(default))
	}

	/// Removes and returns the first (`front`) or last entry.
	///
	/// Fails with [`Error::EmptyMap`] if the map is empty.
	pub fn pop_item(&self, front: bool) -> Result<(K, V), Error> {
		let entry = if front {
			self.write()?.pop_first()
		} else {
			self.write()?.pop_last()
		};

		entry.ok_or(Error::EmptyMap)
	}

	#[inline]
	pub fn pop_first(&self) -> Result<(K, V), Error> {
		self.pop_item(true)
	}

	#[inline]
	pub fn pop_last(&self) -> Result<(K, V), Error> {
		self.pop_item(false)
	}

	/// First entry, with the smallest key.
	pub fn first(&self) -> Option<(K, V)>
	where
		K: Clone,
		V: Clone,
	{
		self.read().first_key_value().map(|(k, v)| (k.clone(), v.clone()))
	}

	/// Last entry, with the greatest key.
	pub fn last(&self) -> Option<(K, V)>
	where
		K: Clone,
		V: Clone,
	{
		self.read().last_key_value().map(|(k, v)| (k.clone(), v.clone()))
	}

	/// Removes every entry.
	pub fn clear(&self) -> Result<(), Error> {
		let nodes = self.write()?.clear();
		// keys and values are dropped here, once the map is released.
		drop(nodes);
		Ok(())
	}

	/// Iterator over the entries, in key order.
	pub fn iter(&self) -> Iter<K, V> {
		Iter::new(self.tree.clone(), Direction::Ascending)
	}

	/// Iterator over the entries, in reverse key order.
	pub fn iter_rev(&self) -> Iter<K, V> {
		Iter::new(self.tree.clone(), Direction::Descending)
	}

	pub fn keys(&self) -> KeysView<K, V> {
		KeysView::new(self.tree.clone())
	}

	pub fn values(&self) -> ValuesView<K, V> {
		ValuesView::new(self.tree.clone())
	}

	pub fn items(&self) -> ItemsView<K, V> {
		ItemsView::new(self.tree.clone())
	}

	/// Insert every entry of `source`.
	///
	/// When `source` is a [`SortedMap`] with the same comparator and `self` is empty,
	/// the content of `source` is copied at once, without comparing keys.
	///
	/// Stops at the first error.
	/// Entries inserted before the error stay in the map.
	pub fn update<S: Source<K, V>>(&self, source: S) -> Result<(), Error> {
		source.merge_into(self)
	}

	/// Insert every entry of `source`, then every entry of `extra`.
	pub fn update_with<S, E>(&self, source: S, extra: E) -> Result<(), Error>
	where
		S: Source<K, V>,
		E: Source<K, V>,
	{
		source.merge_into(self)?;
		extra.merge_into(self)
	}

	/// Compare two maps.
	///
	/// Maps are equal when they have the same length, compatible comparators,
	/// and every key of `self` is bound to an equal value in `other`.
	pub fn equals(&self, other: &SortedMap<K, V>) -> Result<bool, Error>
	where
		V: PartialEq,
	{
		if self.shares_storage_with(other) {
			return Ok(true);
		}

		let a = self.read();
		let b = other.read();

		if a.len() != b.len() || !a.comparator().is_compatible(b.comparator()) {
			return Ok(false);
		}

		for (key, value) in a.iter() {
			match b.get(key)? {
				Some(other_value) if value == other_value => (),
				_ => return Ok(false),
			}
		}

		Ok(true)
	}

	/// Independent copy of the map, with the same comparator.
	///
	/// Keys and values are cloned.
	/// The revision of the copy starts at 0.
	pub fn copy(&self) -> SortedMap<K, V>
	where
		K: Clone,
		V: Clone,
	{
		SortedMap {
			tree: Rc::new(RefCell::new(self.read().duplicate())),
		}
	}

	/// Checks the internal invariants of the map.
	///
	/// Panics if the map is malformed.
	pub fn validate(&self) -> Result<(), Error> {
		self.read().validate()
	}
}

impl<'a, K: Clone, V: Clone> IntoIterator for &'a SortedMap<K, V> {
	type IntoIter = Iter<K, V>;
	type Item = Result<(K, V), Error>;

	fn into_iter(self) -> Iter<K, V> {
		self.iter()
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for SortedMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tree = self.read();
		match tree.comparator().key_fn() {
			Some(key_fn) => write!(f, "SortedMap[{}](", key_fn)?,
			None => write!(f, "SortedMap(")?,
		}

		f.debug_list().entries(tree.iter()).finish()?;
		write!(f, ")")
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&*self.read(), f)
	}
}
