//! This crate provides [`SortedMap`], a map sorted either by the natural order of its keys
//! or by a key function chosen when the map is built.
//!
//! Entries are stored in a B-Tree whose nodes are allocated in a
//! [`Slab`](https://crates.io/crates/slab), reducing the cost of node allocations.
//! The tree itself is available as [`generic::Tree`].
//!
//! ```
//! use sorted_btree::{KeyFn, SortedMap};
//!
//! let map = SortedMap::with_key_fn(KeyFn::new(|k: &i32| -k));
//! map.update(vec![(1, "one"), (2, "two"), (3, "three")]).unwrap();
//!
//! assert_eq!(map.keys().to_vec(), [3, 2, 1]);
//! assert_eq!(map.get(&2).unwrap(), Some("two"));
//! ```
//!
//! # Iterators and views
//!
//! [`SortedMap::keys`], [`SortedMap::values`] and [`SortedMap::items`] return live views:
//! they always reflect the current content of the map.
//! Iterators detect structural changes of the map made after their creation,
//! and report them with [`Error::ConcurrentModification`].
pub mod comparator;
mod error;
mod factory;
pub mod generic;
pub mod map;
pub mod utils;

pub use comparator::{Comparator, KeyFn};
pub use error::{BoxError, Error};
pub use factory::SortedMapFactory;
pub use map::{
	AsMapping, EntryShape, IntoEntry, ItemsView, Iter, Keys, KeysView, Mapping, Pairs, SetOperand, SortedMap, Source,
	Values, ValuesView,
};
