use sorted_btree::{Error, KeyFn, SortedMap};
use std::{
	cmp::Ordering,
	collections::{BTreeSet, HashSet},
};

fn map_of(entries: &[(i32, &'static str)]) -> SortedMap<i32, &'static str> {
	let map = SortedMap::new();
	for (k, v) in entries {
		map.insert(*k, *v).unwrap();
	}
	map
}

fn set<T: std::hash::Hash + Eq + Clone>(items: &[T]) -> HashSet<T> {
	items.iter().cloned().collect()
}

#[test]
pub fn views_are_live() {
	let map = map_of(&[(1, "a")]);
	let keys = map.keys();
	let values = map.values();
	let items = map.items();

	assert_eq!(keys.len(), 1);
	map.insert(2, "b").unwrap();
	map.insert(0, "z").unwrap();

	assert_eq!(keys.to_vec(), [0, 1, 2]);
	assert_eq!(values.to_vec(), ["z", "a", "b"]);
	assert_eq!(items.to_vec(), [(0, "z"), (1, "a"), (2, "b")]);

	map.clear().unwrap();
	assert!(keys.is_empty());
	assert!(values.is_empty());
	assert_eq!(items.len(), 0);
}

#[test]
pub fn membership() {
	let map = map_of(&[(1, "a"), (2, "b"), (3, "a")]);

	assert!(map.keys().contains(&2).unwrap());
	assert!(!map.keys().contains(&4).unwrap());
	assert!(map.values().contains(&"a"));
	assert!(!map.values().contains(&"c"));
	assert!(map.items().contains((&3, &"a")).unwrap());
	assert!(!map.items().contains((&3, &"b")).unwrap());
	assert!(!map.items().contains((&4, &"a")).unwrap());
}

#[test]
pub fn keys_algebra() {
	let m1 = map_of(&[(1, "a"), (2, "b"), (3, "c")]);
	let m2 = map_of(&[(2, "x"), (3, "y"), (4, "z")]);

	assert_eq!((m1.keys() & m2.keys()).unwrap(), set(&[2, 3]));
	assert_eq!((&m1.keys() | vec![9]).unwrap(), set(&[1, 2, 3, 9]));
	assert_eq!((m1.keys() ^ m2.keys()).unwrap(), set(&[1, 4]));
	assert_eq!((m1.keys() - [2, 5]).unwrap(), set(&[1, 3]));

	let keys = m1.keys();
	assert!(keys.set_eq(vec![3, 2, 1]).unwrap());
	assert!(keys.is_subset(BTreeSet::from([0, 1, 2, 3])).unwrap());
	assert!(keys.is_superset(&[1, 3][..]).unwrap());
	assert!(keys.is_disjoint(set(&[7, 8])).unwrap());
	assert!(!keys.is_disjoint(m2.keys()).unwrap());
}

#[test]
pub fn items_algebra() {
	let m1 = map_of(&[(1, "a"), (2, "b")]);
	let m2 = map_of(&[(1, "a"), (2, "c")]);

	assert_eq!((m1.items() & m2.items()).unwrap(), set(&[(1, "a")]));
	assert_eq!((m1.items() - m2.items()).unwrap(), set(&[(2, "b")]));
	assert_eq!((m1.items() ^ &m2.items()).unwrap(), set(&[(2, "b"), (2, "c")]));
	assert_eq!((m1.items() | vec![(5, "e")]).unwrap().len(), 3);
	assert!(m1.items().set_eq(m1.copy().items()).unwrap());
	assert!(!m1.items().set_eq(m2.items()).unwrap());
}

#[test]
pub fn values_sequence() {
	let map = map_of(&[(2, "b"), (1, "a"), (3, "a")]);
	let values = map.values();

	assert_eq!(&values * 2, ["a", "b", "a", "a", "b", "a"]);
	assert_eq!(values.repeat(0), Vec::<&str>::new());
	assert!(values.seq_eq(vec!["a", "b", "a"]));
	assert!(!values.seq_eq(vec!["a", "b"]));
	assert_eq!(map.values() * 1, ["a", "b", "a"]);
}

#[test]
pub fn repeat_owned_values() {
	let map = SortedMap::new();
	map.insert(2, String::from("two")).unwrap();
	map.insert(1, String::from("one")).unwrap();

	let expected: Vec<String> = ["one", "two", "one", "two"].iter().map(|s| s.to_string()).collect();
	assert_eq!(map.values() * 2, expected);
	assert_eq!(map.values().repeat(3).len(), 6);
}

#[test]
pub fn values_ordering() {
	let map = map_of(&[(1, "a"), (2, "b")]);
	let values = map.values();

	assert_eq!(values.seq_cmp(vec!["a", "b"]), Some(Ordering::Equal));
	assert_eq!(values.seq_cmp(vec!["a", "c"]), Some(Ordering::Less));
	assert_eq!(values.seq_cmp(vec!["a"]), Some(Ordering::Greater));
	assert_eq!(values.seq_cmp(vec!["a", "b", "a"]), Some(Ordering::Less));
}

#[test]
pub fn proper_inclusion() {
	let m1 = map_of(&[(1, "a"), (2, "b")]);
	let m2 = map_of(&[(1, "a"), (2, "b"), (3, "c")]);

	assert!(m1.keys().is_proper_subset(m2.keys()).unwrap());
	assert!(!m1.keys().is_proper_subset(m1.copy().keys()).unwrap());
	assert!(m2.keys().is_proper_superset(vec![1, 3]).unwrap());
	assert!(!m2.keys().is_proper_superset(vec![1, 2, 3]).unwrap());
	assert!(!m2.keys().is_proper_superset(vec![4]).unwrap());

	assert!(m1.items().is_proper_subset(m2.items()).unwrap());
	assert!(!m1.items().is_proper_subset(vec![(1, "a"), (2, "x"), (3, "c")]).unwrap());
}

#[test]
pub fn algebra_against_materialized_lists() {
	let m1 = map_of(&[(1, "a"), (2, "b"), (5, "c")]);
	let m2 = map_of(&[(5, "q"), (2, "r"), (7, "s")]);

	let l1: HashSet<i32> = m1.keys().to_vec().into_iter().collect();
	let l2: HashSet<i32> = m2.keys().to_vec().into_iter().collect();
	let expected: HashSet<i32> = l1.intersection(&l2).cloned().collect();

	assert_eq!(m1.keys().intersection(m2.keys()).unwrap(), expected);
	assert_eq!(m1.keys().union(m2.keys()).unwrap(), &l1 | &l2);
	assert_eq!(m1.keys().difference(m2.keys()).unwrap(), &l1 - &l2);
	assert_eq!(m1.keys().symmetric_difference(m2.keys()).unwrap(), &l1 ^ &l2);
}

#[test]
pub fn display() {
	let map = map_of(&[(2, "b"), (1, "a")]);

	assert_eq!(map.keys().to_string(), "KeysView([1, 2])");
	assert_eq!(map.values().to_string(), r#"ValuesView(["a", "b"])"#);
	assert_eq!(map.items().to_string(), r#"ItemsView([(1, "a"), (2, "b")])"#);

	let empty: SortedMap<i32, i32> = SortedMap::new();
	assert_eq!(empty.keys().to_string(), "KeysView([])");
}

#[test]
pub fn failing_key_fn_in_view() {
	let map = SortedMap::with_key_fn(KeyFn::try_new(|k: &i32| if *k < 0 { Err("negative") } else { Ok(*k) }));
	map.insert(1, ()).unwrap();
	map.insert(2, ()).unwrap();

	assert!(matches!(map.keys().contains(&-1), Err(Error::KeyFunction(_))));
	assert!(matches!(map.items().contains((&-1, &())), Err(Error::KeyFunction(_))));
	assert!(map.keys().contains(&2).unwrap());
}
