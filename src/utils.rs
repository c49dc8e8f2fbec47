use crate::{generic::node::Keyed, Comparator, Error};
use std::cmp::Ordering;

/// Search in `sorted_slice` for the item with the nearest key smaller or equal to the given one.
///
/// `sorted_slice` is assumed to be sorted according to `comparator`.
/// On success, returns the index of the item and whether its key is equivalent to `key`.
/// Any comparator failure is returned as is.
#[inline]
pub fn binary_search_min<T: Keyed>(
	comparator: &Comparator<T::Key>,
	sorted_slice: &[T],
	key: &T::Key,
) -> Result<Option<(usize, bool)>, Error> {
	if sorted_slice.is_empty() {
		return Ok(None);
	}

	match comparator.compare(sorted_slice[0].key(), key)? {
		Ordering::Greater => return Ok(None),
		Ordering::Equal => return Ok(Some((0, true))),
		Ordering::Less => (),
	}

	let mut i = 0;
	let mut j = sorted_slice.len() - 1;

	if j == 0 {
		return Ok(Some((0, false)));
	}

	match comparator.compare(sorted_slice[j].key(), key)? {
		Ordering::Greater => (),
		ordering => return Ok(Some((j, ordering == Ordering::Equal))),
	}

	// invariants:
	// sorted_slice[i].key < key
	// sorted_slice[j].key > key
	// j > i

	while j - i > 1 {
		let k = (i + j) / 2;

		match comparator.compare(sorted_slice[k].key(), key)? {
			Ordering::Greater => j = k,
			Ordering::Equal => return Ok(Some((k, true))),
			Ordering::Less => i = k,
		}
	}

	Ok(Some((i, false)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::KeyFn;

	struct Key(i32);

	impl Keyed for Key {
		type Key = i32;

		fn key(&self) -> &i32 {
			&self.0
		}
	}

	fn keys(values: &[i32]) -> Vec<Key> {
		values.iter().copied().map(Key).collect()
	}

	#[test]
	fn natural_search() {
		let cmp = Comparator::natural();
		let slice = keys(&[1, 3, 5, 7, 9]);

		assert_eq!(binary_search_min(&cmp, &slice, &0).unwrap(), None);
		assert_eq!(binary_search_min(&cmp, &slice, &1).unwrap(), Some((0, true)));
		assert_eq!(binary_search_min(&cmp, &slice, &4).unwrap(), Some((1, false)));
		assert_eq!(binary_search_min(&cmp, &slice, &7).unwrap(), Some((3, true)));
		assert_eq!(binary_search_min(&cmp, &slice, &10).unwrap(), Some((4, false)));
		assert_eq!(binary_search_min(&cmp, &keys(&[]), &10).unwrap(), None);
		assert_eq!(binary_search_min(&cmp, &keys(&[2]), &3).unwrap(), Some((0, false)));
	}

	#[test]
	fn derived_search() {
		let cmp = Comparator::derived(KeyFn::new(|k: &i32| -k));
		let slice = keys(&[9, 7, 5, 3, 1]);

		assert_eq!(binary_search_min(&cmp, &slice, &10).unwrap(), None);
		assert_eq!(binary_search_min(&cmp, &slice, &6).unwrap(), Some((1, false)));
		assert_eq!(binary_search_min(&cmp, &slice, &5).unwrap(), Some((2, true)));
	}

	#[test]
	fn failing_search() {
		let cmp = Comparator::derived(KeyFn::try_new(|k: &i32| if *k == 5 { Err("five") } else { Ok(*k) }));
		let slice = keys(&[1, 3, 5, 7, 9]);

		assert!(binary_search_min(&cmp, &slice, &6).is_err());
		assert!(binary_search_min(&cmp, &slice, &0).is_ok());
	}
}
