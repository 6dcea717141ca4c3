//! Dynamically typed values held by state and property containers.
//!
//! Containers compare values with [`Value::strict_eq`], which mirrors strict
//! inequality semantics: numbers compare by IEEE equality (so `NaN` never
//! equals itself), callbacks compare by identity, structured JSON compares by
//! content and values of different kinds are never equal.

use core::fmt;
use std::rc::Rc;

/// A cloneable, shared function value, typically passed down as a prop.
///
/// Two callbacks are equal only when they are clones of the same callback,
/// so re-creating a closure on every render counts as a property change.
///
/// ```
/// use statewise_component::{Callback, Value};
///
/// let on_change = Callback::new(|value| println!("changed to {value}"));
/// on_change.call("abc");
///
/// let same = on_change.clone();
/// assert!(Value::from(same).strict_eq(&Value::from(on_change)));
/// ```
#[derive(Clone)]
pub struct Callback {
	inner: Rc<dyn Fn(Value) + 'static>,
}

impl Callback {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Value) + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given argument.
	pub fn call(&self, arg: impl Into<Value>) {
		(self.inner)(arg.into())
	}

	/// Returns `true` if both callbacks share the same function.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback")
			.field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}

/// A state or property value.
#[derive(Clone, Default)]
pub enum Value {
	/// No value. Used for declared-but-unset state keys and for "absent" in
	/// previous-value maps.
	#[default]
	Undefined,
	/// An explicit empty value. Unlike `Undefined`, a `Null` state key is
	/// defined and can be updated.
	Null,
	/// A boolean.
	Bool(bool),
	/// A number.
	Number(f64),
	/// A string.
	Text(String),
	/// Structured data.
	Json(serde_json::Value),
	/// A function value.
	Callback(Callback),
}

impl Value {
	/// Returns `true` for every value except [`Value::Undefined`].
	pub fn is_defined(&self) -> bool {
		!matches!(self, Self::Undefined)
	}

	/// Strict equality between two values.
	pub fn strict_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a == b,
			(Self::Text(a), Self::Text(b)) => a == b,
			(Self::Json(a), Self::Json(b)) => a == b,
			(Self::Callback(a), Self::Callback(b)) => a.ptr_eq(b),
			_ => false,
		}
	}

	/// Name of the value's kind, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Undefined => "undefined",
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Number(_) => "number",
			Self::Text(_) => "text",
			Self::Json(_) => "json",
			Self::Callback(_) => "callback",
		}
	}

	/// Returns the boolean, if this is one.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the number, if this is one.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the string slice, if this is text.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the structured value, if this is JSON.
	pub fn as_json(&self) -> Option<&serde_json::Value> {
		match self {
			Self::Json(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the callback, if this is one.
	pub fn as_callback(&self) -> Option<&Callback> {
		match self {
			Self::Callback(cb) => Some(cb),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		self.strict_eq(other)
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("Undefined"),
			Self::Null => f.write_str("Null"),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
			Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
			Self::Callback(cb) => fmt::Debug::fmt(cb, f),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("undefined"),
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{b}"),
			// Integral numbers print without a fractional part.
			Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
				write!(f, "{}", *n as i64)
			}
			Self::Number(n) => write!(f, "{n}"),
			Self::Text(s) => f.write_str(s),
			Self::Json(v) => write!(f, "{v}"),
			Self::Callback(_) => f.write_str("[callback]"),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! impl_from_number {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		Self::Json(value)
	}
}

impl From<Callback> for Value {
	fn from(value: Callback) -> Self {
		Self::Callback(value)
	}
}

/// Conversion from a [`Value`] reference used by the typed container accessors.
pub trait FromValue: Sized {
	/// Kind name reported when the conversion fails.
	const EXPECTED: &'static str;

	/// Converts the value, or returns `None` if it has another kind.
	fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
	const EXPECTED: &'static str = "bool";

	fn from_value(value: &Value) -> Option<Self> {
		value.as_bool()
	}
}

impl FromValue for f64 {
	const EXPECTED: &'static str = "number";

	fn from_value(value: &Value) -> Option<Self> {
		value.as_f64()
	}
}

impl FromValue for i64 {
	const EXPECTED: &'static str = "integer";

	fn from_value(value: &Value) -> Option<Self> {
		value
			.as_f64()
			.filter(|n| n.fract() == 0.0 && n.abs() <= i64::MAX as f64)
			.map(|n| n as i64)
	}
}

impl FromValue for String {
	const EXPECTED: &'static str = "text";

	fn from_value(value: &Value) -> Option<Self> {
		value.as_str().map(str::to_string)
	}
}

impl FromValue for serde_json::Value {
	const EXPECTED: &'static str = "json";

	fn from_value(value: &Value) -> Option<Self> {
		value.as_json().cloned()
	}
}

impl FromValue for Callback {
	const EXPECTED: &'static str = "callback";

	fn from_value(value: &Value) -> Option<Self> {
		value.as_callback().cloned()
	}
}
