//! Bulk loading.
//!
//! A [`SortedMap`] can be updated from another sorted map,
//! from anything that looks like a mapping (see [`Mapping`]),
//! or from a sequence of key-value pairs (see [`IntoEntry`]).
use super::SortedMap;
use crate::Error;
use std::{
	collections::{BTreeMap, HashMap},
	hash::{BuildHasher, Hash},
};

/// Source of entries for [`SortedMap::update`].
pub trait Source<K, V> {
	/// Insert every entry of the source in `target`.
	///
	/// Stops at the first error.
	/// Entries inserted before the error stay in `target`.
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error>;
}

impl<'a, K: Clone, V: Clone> Source<K, V> for &'a SortedMap<K, V> {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		if self.shares_storage_with(target) {
			return Ok(());
		}

		if target.is_empty() && target.comparator().is_compatible(&self.comparator()) {
			let copy = self.tree.borrow().duplicate();

			// cloning the entries may have filled the target.
			let mut tree = target.write()?;
			if tree.is_empty() {
				tracing::trace!(len = copy.len(), "sorted map update by copy");
				let old = tree.assign(copy);
				drop(tree);
				drop(old);
				return Ok(());
			}

			drop(tree);
			drop(copy);
		}

		for entry in self.iter() {
			let (key, value) = entry?;
			target.insert(key, value)?;
		}

		Ok(())
	}
}

/// Mapping-like type: key enumeration and subscripting.
pub trait Mapping<K, V> {
	/// Keys of the mapping, in enumeration order.
	fn mapping_keys(&self) -> Result<Vec<K>, Error>;

	/// Value bound to `key`.
	///
	/// Fails with [`Error::KeyNotFound`] if `key` is absent.
	fn subscript(&self, key: &K) -> Result<V, Error>;
}

impl<K: Clone + Hash + Eq, V: Clone, S: BuildHasher> Mapping<K, V> for HashMap<K, V, S> {
	fn mapping_keys(&self) -> Result<Vec<K>, Error> {
		Ok(self.keys().cloned().collect())
	}

	fn subscript(&self, key: &K) -> Result<V, Error> {
		self.get(key).cloned().ok_or(Error::KeyNotFound)
	}
}

impl<K: Clone + Ord, V: Clone> Mapping<K, V> for BTreeMap<K, V> {
	fn mapping_keys(&self) -> Result<Vec<K>, Error> {
		Ok(self.keys().cloned().collect())
	}

	fn subscript(&self, key: &K) -> Result<V, Error> {
		self.get(key).cloned().ok_or(Error::KeyNotFound)
	}
}

impl<K: Clone, V: Clone> Mapping<K, V> for SortedMap<K, V> {
	fn mapping_keys(&self) -> Result<Vec<K>, Error> {
		self.keys().iter().collect()
	}

	fn subscript(&self, key: &K) -> Result<V, Error> {
		self.fetch(key)
	}
}

fn merge_mapping<K, V, M: Mapping<K, V> + ?Sized>(mapping: &M, target: &SortedMap<K, V>) -> Result<(), Error> {
	for key in mapping.mapping_keys()? {
		let value = mapping.subscript(&key)?;
		target.insert(key, value)?;
	}

	Ok(())
}

/// Use any [`Mapping`] as an update source.
pub struct AsMapping<'a, M: ?Sized>(pub &'a M);

impl<'a, K, V, M: Mapping<K, V> + ?Sized> Source<K, V> for AsMapping<'a, M> {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_mapping(self.0, target)
	}
}

impl<'a, K: Clone + Hash + Eq, V: Clone, S: BuildHasher> Source<K, V> for &'a HashMap<K, V, S> {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_mapping(self, target)
	}
}

impl<'a, K: Clone + Ord, V: Clone> Source<K, V> for &'a BTreeMap<K, V> {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_mapping(self, target)
	}
}

/// Why a sequence element cannot be turned into an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryShape {
	/// The element is not a sequence.
	NotASequence,

	/// The element is a sequence of the given length, not 2.
	Length(usize),
}

impl EntryShape {
	fn into_error(self, index: usize) -> Error {
		tracing::debug!(index, shape = ?self, "invalid sorted map update element");
		match self {
			EntryShape::NotASequence => Error::TypeMismatch { index },
			EntryShape::Length(len) => Error::LengthMismatch { index, len },
		}
	}
}

/// Element of an update sequence, convertible into a key-value pair.
pub trait IntoEntry<K, V> {
	fn into_entry(self) -> Result<(K, V), EntryShape>;
}

impl<K, V> IntoEntry<K, V> for (K, V) {
	fn into_entry(self) -> Result<(K, V), EntryShape> {
		Ok(self)
	}
}

fn pair_of<T, I: ExactSizeIterator<Item = T>>(mut items: I) -> Result<(T, T), EntryShape> {
	let len = items.len();
	match (items.next(), items.next(), items.next()) {
		(Some(a), Some(b), None) => Ok((a, b)),
		_ => Err(EntryShape::Length(len)),
	}
}

impl<T> IntoEntry<T, T> for Vec<T> {
	fn into_entry(self) -> Result<(T, T), EntryShape> {
		pair_of(self.into_iter())
	}
}

impl<T, const N: usize> IntoEntry<T, T> for [T; N] {
	fn into_entry(self) -> Result<(T, T), EntryShape> {
		pair_of(self.into_iter())
	}
}

/// A string is the sequence of its characters.
impl<'a> IntoEntry<char, char> for &'a str {
	fn into_entry(self) -> Result<(char, char), EntryShape> {
		let chars: Vec<char> = self.chars().collect();
		chars.into_entry()
	}
}

impl IntoEntry<char, char> for String {
	fn into_entry(self) -> Result<(char, char), EntryShape> {
		self.as_str().into_entry()
	}
}

/// A missing element is not a sequence.
impl<K, V, T: IntoEntry<K, V>> IntoEntry<K, V> for Option<T> {
	fn into_entry(self) -> Result<(K, V), EntryShape> {
		match self {
			Some(t) => t.into_entry(),
			None => Err(EntryShape::NotASequence),
		}
	}
}

fn merge_sequence<K, V, I>(elements: I, target: &SortedMap<K, V>) -> Result<(), Error>
where
	I: IntoIterator,
	I::Item: IntoEntry<K, V>,
{
	for (index, element) in elements.into_iter().enumerate() {
		let (key, value) = element.into_entry().map_err(|shape| shape.into_error(index))?;
		target.insert(key, value)?;
	}

	Ok(())
}

/// Use any iterator of pair-like elements as an update source.
pub struct Pairs<I>(pub I);

impl<K, V, I> Source<K, V> for Pairs<I>
where
	I: IntoIterator,
	I::Item: IntoEntry<K, V>,
{
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_sequence(self.0, target)
	}
}

impl<K, V, T: IntoEntry<K, V>> Source<K, V> for Vec<T> {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_sequence(self, target)
	}
}

impl<K, V, T: IntoEntry<K, V>, const N: usize> Source<K, V> for [T; N] {
	fn merge_into(self, target: &SortedMap<K, V>) -> Result<(), Error> {
		merge_sequence(self, target)
	}
}
