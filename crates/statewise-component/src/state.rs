//! State container
//!
//! The key-set of a [`State`] is fixed when the component is created: a key
//! can only be updated if it already holds a defined value. Writes to unknown
//! or undefined keys are ignored without error.

use core::ops::Deref;

use crate::map::ValueMap;
use crate::previous::PreviousValues;
use crate::value::Value;

/// The named values owned by a component instance.
///
/// ```
/// use statewise_component::{State, Value};
///
/// let state = State::from_iter([("count", Value::from(0)), ("note", Value::Undefined)]);
/// assert!(state.is_defined("count"));
/// assert!(!state.is_defined("note"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
	map: ValueMap,
}

impl State {
	/// Creates an empty state. Such a component can never change state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Applies `partial` onto this (in-progress) state.
	///
	/// A key is written only when it is already defined here and the new
	/// value differs strictly. For every written key, its value in `baseline`
	/// (the state at batch start) is recorded in `previous` unless an earlier
	/// call of the same batch recorded it. Returns the number of writes.
	pub(crate) fn merge_guarded<I>(
		&mut self,
		partial: I,
		baseline: &State,
		previous: &mut PreviousValues,
	) -> usize
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		let mut changed = 0;
		for (key, value) in partial {
			let Some(slot) = self.map.values.get_mut(&key) else {
				tracing::trace!(key = %key, "ignoring write to unknown state key");
				continue;
			};
			if !slot.is_defined() || slot.strict_eq(&value) {
				continue;
			}
			let before = baseline.get(&key).cloned().unwrap_or_default();
			previous.record(key, before);
			*slot = value;
			changed += 1;
		}
		changed
	}
}

impl Deref for State {
	type Target = ValueMap;

	fn deref(&self) -> &ValueMap {
		&self.map
	}
}

impl<K, V> FromIterator<(K, V)> for State
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
