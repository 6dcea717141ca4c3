//! Previous-value maps handed to `on_update`.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::value::Value;

/// Mapping from each key changed in a batch to the value it held before the
/// batch was applied.
///
/// A key that did not exist before the change maps to [`Value::Undefined`].
/// Once a key is recorded its value is never replaced, so a key written
/// several times in one batch keeps its batch-start value.
///
/// ```
/// use statewise_component::{PreviousValues, Value};
///
/// let mut previous = PreviousValues::new();
/// previous.record("count", Value::from(0));
/// previous.record("count", Value::from(1));
///
/// assert_eq!(previous.get("count"), Some(&Value::from(0)));
/// assert!(previous.has_some(["count", "label"]));
/// assert!(!previous.has_some(["label"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviousValues {
	values: BTreeMap<String, Value>,
}

impl PreviousValues {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `value` as the previous value of `key` unless the key was
	/// already recorded. Returns `true` if the entry was added.
	pub fn record(&mut self, key: impl Into<String>, value: Value) -> bool {
		match self.values.entry(key.into()) {
			btree_map::Entry::Vacant(slot) => {
				slot.insert(value);
				true
			}
			btree_map::Entry::Occupied(_) => false,
		}
	}

	/// Adds every entry of `other` whose key is not yet recorded.
	pub fn extend_from(&mut self, other: PreviousValues) {
		for (key, value) in other.values {
			self.record(key, value);
		}
	}

	/// Returns the previous value of `key`, if it changed.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Returns `true` if `key` changed.
	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Returns `true` if any of `keys` changed.
	pub fn has_some<I, K>(&self, keys: I) -> bool
	where
		I: IntoIterator<Item = K>,
		K: AsRef<str>,
	{
		keys.into_iter().any(|key| self.contains(key.as_ref()))
	}

	/// Changed keys in ascending order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	/// Entries in ascending key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Number of changed keys.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns `true` if nothing changed.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Returns `true` if any of `keys` is present in `previous`.
///
/// Convenience for `on_update` implementations that branch on which
/// properties changed.
///
/// ```
/// use statewise_component::{PreviousValues, Value, has_some_prop};
///
/// let mut previous_prop = PreviousValues::new();
/// previous_prop.record("value", Value::from("a"));
/// assert!(has_some_prop(&previous_prop, &["value"]));
/// ```
pub fn has_some_prop(previous: &PreviousValues, keys: &[&str]) -> bool {
	previous.has_some(keys.iter().copied())
}
