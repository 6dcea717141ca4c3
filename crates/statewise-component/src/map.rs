//! Read-only key/value storage shared by [`State`](crate::State) and
//! [`Props`](crate::Props).

use std::collections::BTreeMap;

use crate::error::{ComponentError, ComponentResult};
use crate::value::{FromValue, Value};

/// Ordered mapping from string keys to [`Value`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
	pub(crate) values: BTreeMap<String, Value>,
}

impl ValueMap {
	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Returns the value stored under `key` converted to `T`.
	///
	/// A missing key is reported as a mismatch against `undefined`.
	pub fn get_as<T: FromValue>(&self, key: &str) -> ComponentResult<T> {
		let mismatch = |found| ComponentError::TypeMismatch {
			key: key.to_string(),
			expected: T::EXPECTED,
			found,
		};
		match self.values.get(key) {
			Some(value) => T::from_value(value).ok_or_else(|| mismatch(value.kind())),
			None => Err(mismatch("undefined")),
		}
	}

	/// Returns `true` if `key` is present, even with an undefined value.
	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Returns `true` if `key` is present with a defined value.
	pub fn is_defined(&self, key: &str) -> bool {
		self.values.get(key).is_some_and(Value::is_defined)
	}

	/// Keys in ascending order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	/// Entries in ascending key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns `true` if there are no keys.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		}
	}
}
