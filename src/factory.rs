use crate::{
	map::{Source, SortedMap},
	Error, KeyFn,
};
use std::{fmt, marker::PhantomData};

/// Builder of maps sorted by a given key function.
///
/// A factory names "maps ordered by this function" before any map exists.
/// It is immutable, and every map it builds uses the same key function,
/// so maps built by the same factory have compatible comparators.
///
/// ```
/// use sorted_btree::{KeyFn, SortedMap};
///
/// let by_len = SortedMap::<String, u32>::ordered_by(KeyFn::new(|s: &String| s.len()).with_name("len"));
/// let a = by_len.build();
/// a.insert("abc".to_string(), 1).unwrap();
/// a.insert("z".to_string(), 2).unwrap();
///
/// let b = by_len.build_from(&a).unwrap();
/// assert!(a.equals(&b).unwrap());
/// assert_eq!(by_len.to_string(), "SortedMap[len]");
/// ```
pub struct SortedMapFactory<K, V> {
	key_fn: KeyFn<K>,
	value: PhantomData<fn() -> V>,
}

impl<K, V> SortedMapFactory<K, V> {
	pub fn new(key_fn: KeyFn<K>) -> Self {
		SortedMapFactory {
			key_fn,
			value: PhantomData,
		}
	}

	#[inline]
	pub fn key_fn(&self) -> &KeyFn<K> {
		&self.key_fn
	}

	/// Build an empty map.
	pub fn build(&self) -> SortedMap<K, V> {
		SortedMap::with_key_fn(self.key_fn.clone())
	}

	/// Build a map filled from `source`.
	pub fn build_from<S: Source<K, V>>(&self, source: S) -> Result<SortedMap<K, V>, Error> {
		let map = self.build();
		map.update(source)?;
		Ok(map)
	}

	/// Build a map binding every key to `value`.
	pub fn from_keys<I>(&self, keys: I, value: V) -> Result<SortedMap<K, V>, Error>
	where
		I: IntoIterator<Item = K>,
		V: Clone,
	{
		self.build().with_keys(keys, value)
	}
}

impl<K, V> Clone for SortedMapFactory<K, V> {
	fn clone(&self) -> Self {
		SortedMapFactory::new(self.key_fn.clone())
	}
}

impl<K, V> fmt::Display for SortedMapFactory<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "SortedMap[{}]", self.key_fn)
	}
}

impl<K, V> fmt::Debug for SortedMapFactory<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}
