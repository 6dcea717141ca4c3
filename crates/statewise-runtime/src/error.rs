//! Error types for the continuation runtime.

use thiserror::Error;

/// Errors reported while draining the continuation queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
	/// `run_until_idle` was called from inside a running continuation.
	#[error("continuation queue is already being drained")]
	ReentrantDrain,

	/// The drain hit `max_tasks_per_drain` before the queue became empty.
	///
	/// Continuations that did not run stay queued for the next drain.
	#[error("drain budget exhausted after {executed} continuations ({remaining} still queued)")]
	BudgetExhausted {
		/// Number of continuations executed by this drain.
		executed: usize,
		/// Number of continuations left in the queue.
		remaining: usize,
	},
}

/// Errors raised while loading a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("Parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A field holds a value outside its accepted range.
	#[error("Invalid configuration: {field}: {message}")]
	Invalid {
		/// Field that failed validation.
		field: &'static str,
		/// Validation error message.
		message: String,
	},
}

/// Result type alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
