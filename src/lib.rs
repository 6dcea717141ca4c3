//! # Statewise
//!
//! A minimal base for stateful UI components with batched updates.
//!
//! - State mutations made in one synchronous segment are coalesced into a
//!   single deferred render
//! - Property changes render synchronously, or ride along with a pending
//!   state batch
//! - `on_mount` runs once after the first render, `on_update` after every
//!   later one, each with the batch-start values of what changed
//!
//! ## Feature Flags
//!
//! - `component` (default) - the component base. Without it only the
//!   continuation runtime is available.
//!
//! ## Driving deferred work
//!
//! Deferred work runs on a per-thread FIFO queue. A host either calls
//! [`run_until_idle`] after every synchronous segment, or installs a scheduler
//! hook once with [`set_scheduler`].
//!
//! ## Quick Example
//!
//! ```
//! use statewise::prelude::*;
//!
//! #[derive(Default)]
//! struct Counter {
//!     shown: Vec<i64>,
//! }
//!
//! impl Component for Counter {
//!     fn render(&mut self, cx: &Context<Self>) {
//!         self.shown.push(cx.state().get_as::<i64>("count").unwrap_or_default());
//!     }
//! }
//!
//! let counter = ComponentHandle::new(Counter::default(), State::from_iter([("count", 0)]));
//! run_until_idle().unwrap();
//!
//! counter.set_state(values! { "count" => 1 });
//! counter.set_state(values! { "count" => 2 });
//! run_until_idle().unwrap();
//!
//! assert_eq!(counter.with_component(|c| c.shown.clone()).unwrap(), vec![0, 2]);
//! ```

#![warn(missing_docs)]

pub use statewise_runtime::{
	ConfigError, Runtime, RuntimeConfig, RuntimeError, RuntimeResult, configure, has_scheduler,
	pending_tasks, queue_microtask, run_until_idle, set_scheduler, with_runtime,
};

#[cfg(feature = "component")]
pub use statewise_component::{
	Callback, Component, ComponentError, ComponentHandle, ComponentResult, Context, FromValue,
	LifecyclePhase, PreviousValues, Props, State, Value, ValueMap, WeakHandle, has_some_prop,
	values,
};

/// Runtime building blocks
pub mod runtime {
	pub use statewise_runtime::*;
}

/// Component building blocks
#[cfg(feature = "component")]
pub mod component {
	pub use statewise_component::*;
}

/// Commonly used items
pub mod prelude {
	pub use statewise_runtime::{RuntimeConfig, queue_microtask, run_until_idle};

	#[cfg(feature = "component")]
	pub use statewise_component::{
		Callback, Component, ComponentHandle, Context, PreviousValues, Props, State, Value,
		WeakHandle, has_some_prop, values,
	};
}
