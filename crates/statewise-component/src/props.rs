//! Property container
//!
//! Properties are supplied by the owner of a component. Unlike state, the
//! key-set is open and updates become visible immediately: every change
//! installs a new [`Props`] snapshot built from the update alone.

use core::ops::Deref;

use crate::map::ValueMap;
use crate::previous::PreviousValues;
use crate::value::Value;

/// Externally supplied named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
	map: ValueMap,
}

impl Props {
	/// Creates empty props.
	pub fn new() -> Self {
		Self::default()
	}

	/// Computes the snapshot that replaces these props with `partial`.
	///
	/// The next snapshot holds only the keys of `partial`. The previous-value
	/// map covers the keys of `partial` whose value differs strictly from the
	/// current one; a key that was not present is recorded as
	/// [`Value::Undefined`]. Keys dropped by the replacement are not reported.
	pub(crate) fn replace<I>(&self, partial: I) -> (Props, PreviousValues)
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		let mut next = Props::new();
		let mut previous = PreviousValues::new();
		for (key, value) in partial {
			let current = self.get(&key).cloned().unwrap_or_default();
			if !current.strict_eq(&value) {
				previous.record(key.clone(), current);
			}
			next.map.values.insert(key, value);
		}
		(next, previous)
	}
}

impl Deref for Props {
	type Target = ValueMap;

	fn deref(&self) -> &ValueMap {
		&self.map
	}
}

impl<K, V> FromIterator<(K, V)> for Props
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			map: ValueMap::from_iter(iter),
		}
	}
}
