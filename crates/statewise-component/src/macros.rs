//! Literal syntax for partial updates.

/// Builds a partial update for `set_state` and `set_prop`.
///
/// Keys are anything convertible into `String`, values anything convertible
/// into [`Value`](crate::Value).
///
/// ```
/// use statewise_component::{Value, values};
///
/// let partial = values! {
///     "count" => 1,
///     "label" => "one",
/// };
/// assert_eq!(partial[0], ("count".to_string(), Value::from(1)));
/// assert_eq!(partial.len(), 2);
///
/// let empty = values! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! values {
	() => {
		::std::vec::Vec::<(::std::string::String, $crate::Value)>::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {
		::std::vec![
			$((::std::string::String::from($key), $crate::Value::from($value))),+
		]
	};
}
