use sorted_btree::{map::State, Error, KeyFn, SortedMap};
use std::{cell::Cell, rc::Rc};

fn filled(n: i32) -> SortedMap<i32, i32> {
	let map = SortedMap::new();
	for i in (0..n).rev() {
		map.insert(i, i * 10).unwrap();
	}
	map
}

#[test]
pub fn iter() {
	let map = filled(10);

	let mut i = 0;
	for entry in &map {
		let (key, value) = entry.unwrap();
		assert_eq!(key, i);
		assert_eq!(value, i * 10);
		i += 1;
	}

	assert_eq!(i, 10)
}

#[test]
pub fn iter_rev() {
	let map = filled(100);
	let keys: Vec<i32> = map.iter_rev().map(Result::unwrap).map(|(k, _)| k).collect();
	let expected: Vec<i32> = (0..100).rev().collect();
	assert_eq!(keys, expected);

	let values: Result<Vec<i32>, Error> = map.values().iter_rev().collect();
	assert_eq!(values.unwrap()[0], 990);
}

#[test]
pub fn empty() {
	let map: SortedMap<i32, i32> = SortedMap::new();
	let mut it = map.iter();
	assert_eq!(it.state(), State::Created);
	assert!(it.next().is_none());
	assert_eq!(it.state(), State::Exhausted);
	assert!(it.next().is_none());
}

#[test]
pub fn insert_invalidates() {
	let map = filled(5);
	let mut it = map.iter();
	assert_eq!(it.revision(), map.revision());

	assert_eq!(it.next().unwrap().unwrap(), (0, 0));
	map.insert(42, 0).unwrap();

	assert!(matches!(it.next(), Some(Err(Error::ConcurrentModification))));
	assert_eq!(it.state(), State::Invalidated);
	assert!(it.next().is_none());
	assert!(it.next().is_none());
}

#[test]
pub fn remove_invalidates() {
	let map = filled(5);
	let mut keys = map.keys().iter();
	keys.next().unwrap().unwrap();
	map.remove(&3).unwrap();
	assert!(matches!(keys.next(), Some(Err(Error::ConcurrentModification))));
}

#[test]
pub fn invalidation_precedes_end() {
	let map = filled(1);
	let mut it = map.iter();
	assert_eq!(it.next().unwrap().unwrap(), (0, 0));

	// the iterator is at the end, but the map changed.
	map.insert(1, 10).unwrap();
	assert!(matches!(it.next(), Some(Err(Error::ConcurrentModification))));
}

#[test]
pub fn exhausted_stays_exhausted() {
	let map = filled(2);
	let mut it = map.iter();
	assert_eq!(it.by_ref().count(), 2);
	assert_eq!(it.state(), State::Exhausted);

	map.insert(7, 0).unwrap();
	assert!(it.next().is_none());
}

#[test]
pub fn value_replacement_does_not_invalidate() {
	let map = filled(4);
	let mut it = map.iter();
	assert_eq!(it.next().unwrap().unwrap(), (0, 0));

	map.insert(0, -1).unwrap();
	map.insert(2, -2).unwrap();

	let rest: Vec<(i32, i32)> = it.map(Result::unwrap).collect();
	assert_eq!(rest, [(1, 10), (2, -2), (3, 30)]);
}

#[test]
pub fn clearing_empty_map_does_not_invalidate() {
	let map: SortedMap<i32, i32> = SortedMap::new();
	let mut it = map.iter();
	map.clear().unwrap();
	assert!(it.next().is_none());
}

#[test]
pub fn pop_invalidates_views_iterators() {
	let map = filled(3);
	let mut values = map.values().iter();
	let mut items = map.items().iter_rev();
	assert_eq!(values.next().unwrap().unwrap(), 0);
	assert_eq!(items.next().unwrap().unwrap(), (2, 20));

	map.pop_first().unwrap();
	assert!(matches!(values.next(), Some(Err(Error::ConcurrentModification))));
	assert!(matches!(items.next(), Some(Err(Error::ConcurrentModification))));

	// new iterators start from the current content.
	assert_eq!(map.values().iter().map(Result::unwrap).collect::<Vec<_>>(), [10, 20]);
}

#[test]
pub fn mutation_from_loop_body() {
	let map = filled(10);
	let mut seen = Vec::new();
	let mut failed = false;

	for entry in &map {
		match entry {
			Ok((key, _)) => {
				seen.push(key);
				if key == 4 {
					map.remove(&8).unwrap();
				}
			}
			Err(Error::ConcurrentModification) => failed = true,
			Err(e) => panic!("unexpected error: {}", e),
		}
	}

	assert!(failed);
	assert_eq!(seen, [0, 1, 2, 3, 4]);
}

#[test]
pub fn derived_iteration() {
	let map = SortedMap::with_key_fn(KeyFn::new(|k: &String| k.to_lowercase()));
	for word in ["banana", "Apple", "cherry"] {
		map.insert(word.to_string(), word.len()).unwrap();
	}

	let keys: Vec<String> = map.keys().iter().map(Result::unwrap).collect();
	assert_eq!(keys, ["Apple", "banana", "cherry"]);
}

#[test]
pub fn drop() {
	struct Element {
		/// Drop counter.
		counter: Rc<Cell<usize>>,
		value: i32,
	}

	impl Element {
		pub fn new(counter: &Rc<Cell<usize>>, value: i32) -> Rc<Self> {
			Rc::new(Element {
				counter: counter.clone(),
				value,
			})
		}

		pub fn inner(&self) -> i32 {
			self.value
		}
	}

	impl Drop for Element {
		fn drop(&mut self) {
			let c = self.counter.get();
			self.counter.set(c + 1);
		}
	}

	let counter = Rc::new(Cell::new(0));
	let map = SortedMap::new();
	for i in 0..100 {
		map.insert(i, Element::new(&counter, i)).unwrap();
	}

	for entry in &map {
		let (key, value) = entry.unwrap();
		assert_eq!(key, value.inner());
	}
	assert_eq!(counter.get(), 0);

	// replaced and removed values are released by the map.
	std::mem::drop(map.insert(0, Element::new(&counter, 0)).unwrap());
	assert_eq!(counter.get(), 1);
	std::mem::drop(map.remove(&1).unwrap());
	assert_eq!(counter.get(), 2);

	let kept = map.get(&50).unwrap().unwrap();
	map.clear().unwrap();
	assert_eq!(counter.get(), 100);
	assert_eq!(kept.inner(), 50);

	std::mem::drop(kept);
	assert_eq!(counter.get(), 101);

	for i in 0..10 {
		map.insert(i, Element::new(&counter, i)).unwrap();
	}
	std::mem::drop(map);
	assert_eq!(counter.get(), 111);
}
