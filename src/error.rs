use thiserror::Error;

/// Boxed error raised by user code, such as a failing key function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`SortedMap`](crate::SortedMap) operations.
#[derive(Debug, Error)]
pub enum Error {
	/// A strict lookup did not find the key.
	#[error("key not found")]
	KeyNotFound,

	/// Tried to pop an entry from an empty map.
	#[error("sorted map is empty")]
	EmptyMap,

	/// An update sequence element could not be viewed as a sequence.
	#[error("cannot convert sorted map update sequence element {index} to a sequence")]
	TypeMismatch { index: usize },

	/// An update sequence element is a sequence of the wrong length.
	#[error("sorted map update sequence element {index} has length {len}; 2 is required")]
	LengthMismatch { index: usize, len: usize },

	/// The map changed size while it was being iterated.
	#[error("sorted map changed size during iteration")]
	ConcurrentModification,

	/// The map was mutated from inside one of its own operations
	/// (typically from a key function).
	#[error("sorted map is in use by an operation in progress")]
	Borrowed,

	/// The key function failed.
	#[error("key function failed: {0}")]
	KeyFunction(#[source] BoxError),
}
