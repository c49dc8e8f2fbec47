//! Live views on the keys, values and entries of a map.
//!
//! A view shares the storage of its map: it is never a copy,
//! and every operation reads the current content of the map.
//! Views are not iterators: they are never invalidated,
//! only the iterators they create are.
//!
//! Keys and entries are unique, hence [`KeysView`] and [`ItemsView`] support set operations.
//! Values may be repeated, so [`ValuesView`] only supports sequence operations.
use super::iter::{Direction, Iter, Keys, Values};
use crate::{
	generic::Tree,
	Error,
};
use std::{
	cell::RefCell,
	cmp::Ordering,
	collections::{BTreeSet, HashSet},
	fmt,
	hash::Hash,
	ops::{BitAnd, BitOr, BitXor, Mul, Sub},
	rc::Rc,
};

/// Right-hand side of a set operation.
///
/// The operand is materialized into a [`HashSet`] before the operation.
pub trait SetOperand<T> {
	fn into_set(self) -> Result<HashSet<T>, Error>;
}

impl<T: Hash + Eq> SetOperand<T> for HashSet<T> {
	fn into_set(self) -> Result<HashSet<T>, Error> {
		Ok(self)
	}
}

impl<T: Hash + Eq> SetOperand<T> for BTreeSet<T> {
	fn into_set(self) -> Result<HashSet<T>, Error> {
		Ok(self.into_iter().collect())
	}
}

impl<T: Hash + Eq> SetOperand<T> for Vec<T> {
	fn into_set(self) -> Result<HashSet<T>, Error> {
		Ok(self.into_iter().collect())
	}
}

impl<T: Hash + Eq, const N: usize> SetOperand<T> for [T; N] {
	fn into_set(self) -> Result<HashSet<T>, Error> {
		Ok(self.into_iter().collect())
	}
}

impl<'a, T: Hash + Eq + Clone> SetOperand<T> for &'a [T] {
	fn into_set(self) -> Result<HashSet<T>, Error> {
		Ok(self.iter().cloned().collect())
	}
}

impl<'a, K: Hash + Eq + Clone, V: Clone> SetOperand<K> for &'a KeysView<K, V> {
	fn into_set(self) -> Result<HashSet<K>, Error> {
		self.to_set()
	}
}

impl<K: Hash + Eq + Clone, V: Clone> SetOperand<K> for KeysView<K, V> {
	fn into_set(self) -> Result<HashSet<K>, Error> {
		self.to_set()
	}
}

impl<'a, K: Hash + Eq + Clone, V: Hash + Eq + Clone> SetOperand<(K, V)> for &'a ItemsView<K, V> {
	fn into_set(self) -> Result<HashSet<(K, V)>, Error> {
		self.to_set()
	}
}

impl<K: Hash + Eq + Clone, V: Hash + Eq + Clone> SetOperand<(K, V)> for ItemsView<K, V> {
	fn into_set(self) -> Result<HashSet<(K, V)>, Error> {
		self.to_set()
	}
}

/// Set operations shared by the key and entry views,
/// computed on the materialized set.
macro_rules! set_algebra {
	($view:ident, $elem:ty, [$($bounds:tt)*]) => {
		impl<K, V> $view<K, V>
		where
			$($bounds)*
		{
			/// Elements of the view, as a set.
			pub fn to_set(&self) -> Result<HashSet<$elem>, Error> {
				self.iter().collect()
			}

			/// Elements present in both the view and `other`.
			pub fn intersection<O: SetOperand<$elem>>(&self, other: O) -> Result<HashSet<$elem>, Error> {
				let other = other.into_set()?;
				Ok(self.to_set()?.into_iter().filter(|e| other.contains(e)).collect())
			}

			/// Elements present in the view or in `other`.
			pub fn union<O: SetOperand<$elem>>(&self, other: O) -> Result<HashSet<$elem>, Error> {
				let mut set = self.to_set()?;
				set.extend(other.into_set()?);
				Ok(set)
			}

			/// Elements present in exactly one of the view and `other`.
			pub fn symmetric_difference<O: SetOperand<$elem>>(&self, other: O) -> Result<HashSet<$elem>, Error> {
				let set = self.to_set()?;
				let other = other.into_set()?;
				Ok(set.symmetric_difference(&other).cloned().collect())
			}

			/// Elements of the view that are not in `other`.
			pub fn difference<O: SetOperand<$elem>>(&self, other: O) -> Result<HashSet<$elem>, Error> {
				let other = other.into_set()?;
				Ok(self.to_set()?.into_iter().filter(|e| !other.contains(e)).collect())
			}

			/// Checks if the view and `other` hold the same elements.
			pub fn set_eq<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				Ok(self.to_set()? == other.into_set()?)
			}

			pub fn is_subset<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				Ok(self.to_set()?.is_subset(&other.into_set()?))
			}

			pub fn is_superset<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				Ok(self.to_set()?.is_superset(&other.into_set()?))
			}

			pub fn is_disjoint<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				Ok(self.to_set()?.is_disjoint(&other.into_set()?))
			}

			/// Checks if the view is a subset of `other`, and not equal to it.
			pub fn is_proper_subset<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				let (set, other) = (self.to_set()?, other.into_set()?);
				Ok(set.len() < other.len() && set.is_subset(&other))
			}

			/// Checks if the view is a superset of `other`, and not equal to it.
			pub fn is_proper_superset<O: SetOperand<$elem>>(&self, other: O) -> Result<bool, Error> {
				let (set, other) = (self.to_set()?, other.into_set()?);
				Ok(set.len() > other.len() && set.is_superset(&other))
			}
		}

		set_algebra!(@op $view, $elem, [$($bounds)*], BitAnd, bitand, intersection);
		set_algebra!(@op $view, $elem, [$($bounds)*], BitOr, bitor, union);
		set_algebra!(@op $view, $elem, [$($bounds)*], BitXor, bitxor, symmetric_difference);
		set_algebra!(@op $view, $elem, [$($bounds)*], Sub, sub, difference);
	};
	(@op $view:ident, $elem:ty, [$($bounds:tt)*], $trait:ident, $method:ident, $op:ident) => {
		impl<'a, K, V, O: SetOperand<$elem>> $trait<O> for &'a $view<K, V>
		where
			$($bounds)*
		{
			type Output = Result<HashSet<$elem>, Error>;

			fn $method(self, other: O) -> Self::Output {
				self.$op(other)
			}
		}

		impl<K, V, O: SetOperand<$elem>> $trait<O> for $view<K, V>
		where
			$($bounds)*
		{
			type Output = Result<HashSet<$elem>, Error>;

			fn $method(self, other: O) -> Self::Output {
				self.$op(other)
			}
		}
	};
}

/// Live view on the keys of a map, in key order.
pub struct KeysView<K, V> {
	tree: Rc<RefCell<Tree<K, V>>>,
}

impl<K, V> KeysView<K, V> {
	pub(crate) fn new(tree: Rc<RefCell<Tree<K, V>>>) -> Self {
		KeysView { tree }
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.tree.borrow().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tree.borrow().is_empty()
	}

	/// Checks if the map contains a key equivalent to `key`.
	pub fn contains(&self, key: &K) -> Result<bool, Error> {
		self.tree.borrow().contains_key(key)
	}

	pub fn iter(&self) -> Keys<K, V> {
		Keys::new(self.tree.clone(), Direction::Ascending)
	}

	pub fn iter_rev(&self) -> Keys<K, V> {
		Keys::new(self.tree.clone(), Direction::Descending)
	}

	/// Keys of the map, in order.
	pub fn to_vec(&self) -> Vec<K>
	where
		K: Clone,
	{
		self.tree.borrow().iter().map(|(k, _)| k.clone()).collect()
	}
}

set_algebra!(KeysView, K, [K: Hash + Eq + Clone, V: Clone]);

impl<K: fmt::Debug, V> fmt::Display for KeysView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tree = self.tree.borrow();
		write!(f, "KeysView(")?;
		f.debug_list().entries(tree.iter().map(|(k, _)| k)).finish()?;
		write!(f, ")")
	}
}

impl<K: fmt::Debug, V> fmt::Debug for KeysView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

/// Live view on the values of a map, in key order.
pub struct ValuesView<K, V> {
	tree: Rc<RefCell<Tree<K, V>>>,
}

impl<K, V> ValuesView<K, V> {
	pub(crate) fn new(tree: Rc<RefCell<Tree<K, V>>>) -> Self {
		ValuesView { tree }
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.tree.borrow().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tree.borrow().is_empty()
	}

	/// Checks if some key of the map is bound to `value`.
	///
	/// This is a linear search.
	pub fn contains(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.tree.borrow().iter().any(|(_, v)| v == value)
	}

	pub fn iter(&self) -> Values<K, V> {
		Values::new(self.tree.clone(), Direction::Ascending)
	}

	pub fn iter_rev(&self) -> Values<K, V> {
		Values::new(self.tree.clone(), Direction::Descending)
	}

	/// Values of the map, in key order.
	pub fn to_vec(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.tree.borrow().iter().map(|(_, v)| v.clone()).collect()
	}

	/// Values of the map repeated `n` times.
	pub fn repeat(&self, n: usize) -> Vec<V>
	where
		V: Clone,
	{
		let values = self.to_vec();
		let mut repeated = Vec::with_capacity(values.len() * n);
		for _ in 0..n {
			repeated.extend_from_slice(&values);
		}

		repeated
	}

	/// Lexicographic comparison of the values of the map, in order, with the given sequence.
	pub fn seq_cmp<I>(&self, other: I) -> Option<Ordering>
	where
		I: IntoIterator<Item = V>,
		V: PartialOrd,
	{
		let other: Vec<V> = other.into_iter().collect();
		let tree = self.tree.borrow();
		tree.iter().map(|(_, v)| v).partial_cmp(other.iter())
	}

	/// Compare the values of the map, in order, with the given sequence.
	pub fn seq_eq<I>(&self, other: I) -> bool
	where
		I: IntoIterator<Item = V>,
		V: PartialEq,
	{
		let tree = self.tree.borrow();
		tree.iter().map(|(_, v)| v).eq(other.into_iter().collect::<Vec<_>>().iter())
	}
}

impl<'a, K, V: Clone> Mul<usize> for &'a ValuesView<K, V> {
	type Output = Vec<V>;

	fn mul(self, n: usize) -> Vec<V> {
		self.repeat(n)
	}
}

impl<K, V: Clone> Mul<usize> for ValuesView<K, V> {
	type Output = Vec<V>;

	fn mul(self, n: usize) -> Vec<V> {
		self.repeat(n)
	}
}

impl<K, V: fmt::Debug> fmt::Display for ValuesView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tree = self.tree.borrow();
		write!(f, "ValuesView(")?;
		f.debug_list().entries(tree.iter().map(|(_, v)| v)).finish()?;
		write!(f, ")")
	}
}

impl<K, V: fmt::Debug> fmt::Debug for ValuesView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

/// Live view on the entries of a map, in key order.
pub struct ItemsView<K, V> {
	tree: Rc<RefCell<Tree<K, V>>>,
}

impl<K, V> ItemsView<K, V> {
	pub(crate) fn new(tree: Rc<RefCell<Tree<K, V>>>) -> Self {
		ItemsView { tree }
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.tree.borrow().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tree.borrow().is_empty()
	}

	/// Checks if `key` is bound to `value` in the map.
	pub fn contains(&self, (key, value): (&K, &V)) -> Result<bool, Error>
	where
		V: PartialEq,
	{
		Ok(self.tree.borrow().get(key)?.map_or(false, |v| v == value))
	}

	pub fn iter(&self) -> Iter<K, V> {
		Iter::new(self.tree.clone(), Direction::Ascending)
	}

	pub fn iter_rev(&self) -> Iter<K, V> {
		Iter::new(self.tree.clone(), Direction::Descending)
	}

	/// Entries of the map, in order.
	pub fn to_vec(&self) -> Vec<(K, V)>
	where
		K: Clone,
		V: Clone,
	{
		self.tree.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
	}
}

set_algebra!(ItemsView, (K, V), [K: Hash + Eq + Clone, V: Hash + Eq + Clone]);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for ItemsView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tree = self.tree.borrow();
		write!(f, "ItemsView(")?;
		f.debug_list().entries(tree.iter()).finish()?;
		write!(f, ")")
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ItemsView<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}
