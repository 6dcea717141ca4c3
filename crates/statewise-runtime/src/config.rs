//! Runtime configuration
//!
//! Limits applied to each drain of the continuation queue. The defaults are
//! suitable for interactive use; hosts can tighten them or load them from TOML.
//!
//! ```
//! use statewise_runtime::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str("max_tasks_per_drain = 256").unwrap();
//! assert_eq!(config.max_tasks_per_drain(), 256);
//! assert!(config.warn_on_budget_exhausted());
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Default maximum number of continuations executed by one drain
const DEFAULT_MAX_TASKS_PER_DRAIN: usize = 10_000;

/// Configuration for a thread's [`Runtime`](crate::Runtime).
///
/// # Examples
///
/// ```
/// use statewise_runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::default()
///     .with_max_tasks_per_drain(64)
///     .with_warn_on_budget_exhausted(false);
/// assert_eq!(config.max_tasks_per_drain(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
	max_tasks_per_drain: usize,
	warn_on_budget_exhausted: bool,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			max_tasks_per_drain: DEFAULT_MAX_TASKS_PER_DRAIN,
			warn_on_budget_exhausted: true,
		}
	}
}

impl RuntimeConfig {
	/// Parses and validates a configuration from a TOML document.
	///
	/// Missing fields take their default value; unknown fields are rejected.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that every field is within its accepted range.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_tasks_per_drain == 0 {
			return Err(ConfigError::Invalid {
				field: "max_tasks_per_drain",
				message: "must be greater than zero".to_string(),
			});
		}
		Ok(())
	}

	/// Maximum number of continuations a single drain executes.
	pub fn max_tasks_per_drain(&self) -> usize {
		self.max_tasks_per_drain
	}

	/// Whether a drain that stops early logs a warning.
	pub fn warn_on_budget_exhausted(&self) -> bool {
		self.warn_on_budget_exhausted
	}

	/// Sets the per-drain continuation budget.
	pub fn with_max_tasks_per_drain(mut self, max: usize) -> Self {
		self.max_tasks_per_drain = max;
		self
	}

	/// Enables or disables the budget-exhaustion warning.
	pub fn with_warn_on_budget_exhausted(mut self, warn: bool) -> Self {
		self.warn_on_budget_exhausted = warn;
		self
	}
}
