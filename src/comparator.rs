//! Key ordering.
//!
//! A map is either ordered by the natural order of its keys ([`Ord`]),
//! or by a key function projecting every key onto a value of some other
//! ordered type ([`KeyFn`]).
use crate::{BoxError, Error};
use std::{cmp::Ordering, fmt, rc::Rc};

type CompareFn<K> = dyn Fn(&K, &K) -> Result<Ordering, BoxError>;

/// Key function.
///
/// Wraps a projection `K -> P` where `P: Ord`.
/// Keys are compared by comparing their projections.
/// The projection is called for both operands of every comparison,
/// its results are never cached.
///
/// Two key functions are the *same* if one is a clone of the other.
/// Two separately built key functions are different, even when they compute the same thing.
///
/// ```
/// use sorted_btree::{KeyFn, SortedMap};
///
/// let map = SortedMap::with_key_fn(KeyFn::new(|k: &i32| -k));
/// map.insert(1, "a").unwrap();
/// map.insert(2, "b").unwrap();
/// map.insert(3, "c").unwrap();
///
/// assert_eq!(map.keys().to_vec(), [3, 2, 1]);
/// ```
pub struct KeyFn<K> {
	compare: Rc<CompareFn<K>>,
	name: Option<Rc<str>>,
}

impl<K> KeyFn<K> {
	/// Create a key function from an infallible projection.
	pub fn new<P, F>(f: F) -> Self
	where
		P: Ord,
		F: Fn(&K) -> P + 'static,
	{
		Self::from_compare(move |a, b| Ok(f(a).cmp(&f(b))))
	}

	/// Create a key function from a projection that may fail.
	///
	/// A failure aborts the map operation that triggered the comparison
	/// and is returned as [`Error::KeyFunction`].
	pub fn try_new<P, E, F>(f: F) -> Self
	where
		P: Ord,
		E: Into<BoxError>,
		F: Fn(&K) -> Result<P, E> + 'static,
	{
		Self::from_compare(move |a, b| {
			let pa = f(a).map_err(Into::<BoxError>::into)?;
			let pb = f(b).map_err(Into::<BoxError>::into)?;
			Ok(pa.cmp(&pb))
		})
	}

	fn from_compare<F>(compare: F) -> Self
	where
		F: Fn(&K, &K) -> Result<Ordering, BoxError> + 'static,
	{
		KeyFn {
			compare: Rc::new(compare),
			name: None,
		}
	}

	/// Attach a name to this key function, used when displaying maps.
	///
	/// Naming does not change the identity of the function.
	pub fn with_name(mut self, name: &str) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Checks if `self` and `other` are the same function.
	#[inline]
	pub fn same_as(&self, other: &KeyFn<K>) -> bool {
		Rc::ptr_eq(&self.compare, &other.compare)
	}

	#[inline]
	fn compare(&self, a: &K, b: &K) -> Result<Ordering, Error> {
		(self.compare)(a, b).map_err(|e| {
			tracing::debug!(error = %e, "key function failed");
			Error::KeyFunction(e)
		})
	}
}

impl<K> Clone for KeyFn<K> {
	fn clone(&self) -> Self {
		KeyFn {
			compare: self.compare.clone(),
			name: self.name.clone(),
		}
	}
}

impl<K> PartialEq for KeyFn<K> {
	fn eq(&self, other: &KeyFn<K>) -> bool {
		self.same_as(other)
	}
}

impl<K> fmt::Display for KeyFn<K> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match &self.name {
			Some(name) => f.write_str(name),
			None => write!(f, "<key fn at {:p}>", Rc::as_ptr(&self.compare) as *const ()),
		}
	}
}

impl<K> fmt::Debug for KeyFn<K> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "KeyFn({})", self)
	}
}

enum Kind<K> {
	Natural(fn(&K, &K) -> Ordering),
	Derived(KeyFn<K>),
}

/// Ordering rule of a map.
///
/// The rule is chosen once, when the map is built, and never changes afterward.
pub struct Comparator<K> {
	kind: Kind<K>,
}

impl<K> Comparator<K> {
	/// Natural order of the keys.
	pub fn natural() -> Self
	where
		K: Ord,
	{
		Comparator {
			kind: Kind::Natural(<K as Ord>::cmp),
		}
	}

	/// Order defined by the given key function.
	pub fn derived(key_fn: KeyFn<K>) -> Self {
		Comparator {
			kind: Kind::Derived(key_fn),
		}
	}

	#[inline]
	pub fn is_natural(&self) -> bool {
		matches!(self.kind, Kind::Natural(_))
	}

	/// Returns the key function, if any.
	#[inline]
	pub fn key_fn(&self) -> Option<&KeyFn<K>> {
		match &self.kind {
			Kind::Natural(_) => None,
			Kind::Derived(key_fn) => Some(key_fn),
		}
	}

	/// Compare two keys.
	#[inline]
	pub fn compare(&self, a: &K, b: &K) -> Result<Ordering, Error> {
		match &self.kind {
			Kind::Natural(cmp) => Ok(cmp(a, b)),
			Kind::Derived(key_fn) => key_fn.compare(a, b),
		}
	}

	/// Checks if `a` is strictly before `b`.
	#[inline]
	pub fn less(&self, a: &K, b: &K) -> Result<bool, Error> {
		Ok(self.compare(a, b)? == Ordering::Less)
	}

	/// Checks if `a` and `b` fall in the same map slot.
	#[inline]
	pub fn equivalent(&self, a: &K, b: &K) -> Result<bool, Error> {
		Ok(self.compare(a, b)? == Ordering::Equal)
	}

	/// Checks if maps ordered by `self` and `other` can share their structure.
	///
	/// This is an identity check: both natural, or both using the same key function.
	pub fn is_compatible(&self, other: &Comparator<K>) -> bool {
		match (&self.kind, &other.kind) {
			(Kind::Natural(_), Kind::Natural(_)) => true,
			(Kind::Derived(a), Kind::Derived(b)) => a.same_as(b),
			_ => false,
		}
	}
}

impl<K> Clone for Comparator<K> {
	fn clone(&self) -> Self {
		let kind = match &self.kind {
			Kind::Natural(cmp) => Kind::Natural(*cmp),
			Kind::Derived(key_fn) => Kind::Derived(key_fn.clone()),
		};

		Comparator { kind }
	}
}

impl<K> PartialEq for Comparator<K> {
	fn eq(&self, other: &Comparator<K>) -> bool {
		self.is_compatible(other)
	}
}

impl<K> From<KeyFn<K>> for Comparator<K> {
	fn from(key_fn: KeyFn<K>) -> Self {
		Comparator::derived(key_fn)
	}
}

impl<K> fmt::Debug for Comparator<K> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match &self.kind {
			Kind::Natural(_) => f.write_str("Natural"),
			Kind::Derived(key_fn) => write!(f, "Derived({})", key_fn),
		}
	}
}
