//! Lifecycle Dispatcher
//!
//! Tracks whether a component has completed its first render and decides
//! which hook follows each render:
//!
//! ```text
//! NotMounted --first render--> Mounted --render--> Mounted ...
//!              (on_mount)               (on_update)
//! ```
//!
//! Hooks never run inside the render that caused them. The component handle
//! queues the hook owed after each render as its own continuation, so a
//! mutation made by a hook starts a fresh batch.

use crate::component::{Component, Context};
use crate::previous::PreviousValues;

/// Lifecycle phase of a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
	/// Created, first render still outstanding.
	#[default]
	NotMounted,
	/// At least one render has completed.
	Mounted,
}

/// The hook owed to a component after a render.
#[derive(Debug)]
pub(crate) enum Hook {
	Mount,
	Update {
		previous_state: PreviousValues,
		previous_prop: PreviousValues,
	},
}

impl Hook {
	/// Invokes the hook on the component.
	pub(crate) fn dispatch<C: Component>(self, component: &mut C, cx: &Context<C>) {
		match self {
			Self::Mount => {
				tracing::debug!(component = C::name(), "dispatching on_mount");
				component.on_mount(cx);
			}
			Self::Update {
				previous_state,
				previous_prop,
			} => {
				tracing::debug!(
					component = C::name(),
					changed_state = previous_state.len(),
					changed_prop = previous_prop.len(),
					"dispatching on_update"
				);
				component.on_update(cx, &previous_state, &previous_prop);
			}
		}
	}
}

/// Per-instance lifecycle record.
#[derive(Debug, Default)]
pub(crate) struct LifecycleDispatcher {
	initialized: bool,
	renders: u64,
}

impl LifecycleDispatcher {
	/// Whether the first render has happened.
	pub(crate) fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Current phase.
	pub(crate) fn phase(&self) -> LifecyclePhase {
		if self.initialized {
			LifecyclePhase::Mounted
		} else {
			LifecyclePhase::NotMounted
		}
	}

	/// Number of renders started so far.
	pub(crate) fn renders(&self) -> u64 {
		self.renders
	}

	/// Records a render and returns the hook that must follow it.
	///
	/// The first call flips `initialized` and yields [`Hook::Mount`]; the
	/// previous-value maps of that render are dropped.
	pub(crate) fn begin_render(
		&mut self,
		previous_state: PreviousValues,
		previous_prop: PreviousValues,
	) -> Hook {
		self.renders += 1;
		if !self.initialized {
			self.initialized = true;
			return Hook::Mount;
		}
		Hook::Update {
			previous_state,
			previous_prop,
		}
	}
}
