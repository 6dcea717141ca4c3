//! Error types for component operations.

use thiserror::Error;

/// Errors that can occur while updating or inspecting a component.
///
/// Ordinary misuse is not an error: writing an unknown or undefined state key
/// is silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
	/// A synchronous render was requested for a component whose `render` is
	/// already running. Nothing was applied.
	#[error("{component} is already rendering; synchronous re-render refused")]
	ReentrantRender {
		/// Name of the component.
		component: &'static str,
	},

	/// The component value is mutably borrowed by a running render or hook.
	#[error("{component} is busy rendering")]
	ComponentBusy {
		/// Name of the component.
		component: &'static str,
	},

	/// A typed accessor found a value of another kind.
	#[error("Type mismatch for `{key}`: expected {expected}, found {found}")]
	TypeMismatch {
		/// Key that was read.
		key: String,
		/// Kind the caller asked for.
		expected: &'static str,
		/// Kind actually stored.
		found: &'static str,
	},
}

/// Result type alias for component operations.
pub type ComponentResult<T> = Result<T, ComponentError>;
