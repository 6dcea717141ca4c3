//! Component base
//!
//! [`Component`] is implemented by concrete UI components; [`ComponentHandle`]
//! owns an instance together with its state, props and scheduling record and
//! exposes the mutation API.
//!
//! ## Update flow
//!
//! 1. `set_state` stages the change; the first change of a batch queues one flush
//! 2. `set_prop` applies the change immediately and renders synchronously, unless
//!    a flush is pending, in which case the change rides along with it
//! 3. Every render is followed by exactly one lifecycle hook, queued as its own
//!    continuation
//! 4. Work that finds the component value borrowed (by a hook or by
//!    `with_component`) is owed and runs, in order, as soon as it is released
//!
//! Queued continuations only hold weak references: dropping the last handle
//! discards the instance, and its outstanding flushes and hooks do nothing.
//!
//! ## Example
//!
//! ```
//! use statewise_component::{Component, ComponentHandle, Context, State, values};
//! use statewise_runtime::run_until_idle;
//!
//! #[derive(Default)]
//! struct Counter {
//!     painted: Vec<i64>,
//! }
//!
//! impl Component for Counter {
//!     fn render(&mut self, cx: &Context<Self>) {
//!         self.painted.push(cx.state().get_as::<i64>("count").unwrap_or_default());
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
//! let painted = counter.with_component(|c| c.painted.clone()).unwrap();
//! assert_eq!(painted, vec![0, 2]);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use statewise_runtime::queue_microtask;

use crate::error::{ComponentError, ComponentResult};
use crate::lifecycle::{Hook, LifecycleDispatcher, LifecyclePhase};
use crate::previous::PreviousValues;
use crate::props::Props;
use crate::scheduler::{Flush, PropStage, StateStage, UpdateScheduler};
use crate::state::State;
use crate::value::Value;

/// Trait for stateful UI components.
///
/// `render` paints the component from its *current* state and props. The
/// hooks run after the render that caused them, in a separate continuation.
///
/// The default `render` paints nothing and logs a warning naming the
/// component, so a component that forgets to override it degrades instead of
/// failing.
///
/// # Example
///
/// ```
/// use statewise_component::{Component, Context, PreviousValues};
///
/// struct Label {
///     text: String,
/// }
///
/// impl Component for Label {
///     fn render(&mut self, cx: &Context<Self>) {
///         self.text = cx.prop().get_as::<String>("text").unwrap_or_default();
///     }
///
///     fn on_update(
///         &mut self,
///         _cx: &Context<Self>,
///         _previous_state: &PreviousValues,
///         previous_prop: &PreviousValues,
///     ) {
///         if previous_prop.has_some(["text"]) {
///             println!("label changed to {}", self.text);
///         }
///     }
/// }
/// ```
pub trait Component: Sized + 'static {
	/// Paints the component.
	fn render(&mut self, cx: &Context<Self>) {
		let _ = cx;
		tracing::warn!(
			component = Self::name(),
			"component did not override the render function"
		);
	}

	/// Called once, after the first render.
	fn on_mount(&mut self, cx: &Context<Self>) {
		let _ = cx;
	}

	/// Called after every later render with the batch-start values of the
	/// state keys and props that changed.
	fn on_update(
		&mut self,
		cx: &Context<Self>,
		previous_state: &PreviousValues,
		previous_prop: &PreviousValues,
	) {
		let _ = (cx, previous_state, previous_prop);
	}

	/// Returns the component's name for diagnostics.
	fn name() -> &'static str {
		short_type_name::<Self>()
	}
}

fn short_type_name<T>() -> &'static str {
	let full = core::any::type_name::<T>();
	let path = full.split('<').next().unwrap_or(full);
	path.rsplit("::").next().unwrap_or(path)
}

fn collect_partial<I, K, V>(partial: I) -> Vec<(String, Value)>
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<Value>,
{
	partial
		.into_iter()
		.map(|(key, value)| (key.into(), value.into()))
		.collect()
}

/// Work that found the component value borrowed and runs once it is released
enum Owed {
	FirstRender,
	Render(PreviousValues),
	Flush,
	Hook(Hook),
}

/// Scheduling fields of an instance
struct Core {
	state: Rc<State>,
	prop: Rc<Props>,
	scheduler: UpdateScheduler,
	lifecycle: LifecycleDispatcher,
	/// Oldest first
	owed: VecDeque<Owed>,
}

struct Instance<C> {
	core: RefCell<Core>,
	component: RefCell<C>,
	/// Set only while `render` is on the stack
	rendering: Cell<bool>,
}

/// Clears the rendering flag when `render` returns, including by unwinding.
struct RenderGuard<'a>(&'a Cell<bool>);

impl<'a> RenderGuard<'a> {
	fn enter(flag: &'a Cell<bool>) -> Self {
		flag.set(true);
		Self(flag)
	}
}

impl Drop for RenderGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// Owning handle to a component instance.
///
/// Cloning the handle shares the instance. The instance is discarded when the
/// last handle is dropped.
pub struct ComponentHandle<C: Component> {
	inner: Rc<Instance<C>>,
}

impl<C: Component> ComponentHandle<C> {
	/// Creates an instance with empty props and schedules its first render.
	pub fn new(component: C, state: State) -> Self {
		Self::with_props(component, state, Props::new())
	}

	/// Creates an instance with initial props and schedules its first render.
	///
	/// The first render is skipped if a synchronous `set_prop` renders the
	/// instance before the scheduled continuation runs.
	pub fn with_props(component: C, state: State, prop: Props) -> Self {
		let handle = Self {
			inner: Rc::new(Instance {
				core: RefCell::new(Core {
					state: Rc::new(state),
					prop: Rc::new(prop),
					scheduler: UpdateScheduler::default(),
					lifecycle: LifecycleDispatcher::default(),
					owed: VecDeque::new(),
				}),
				component: RefCell::new(component),
				rendering: Cell::new(false),
			}),
		};

		let weak = handle.downgrade();
		queue_microtask(move || {
			if let Some(handle) = weak.upgrade() {
				handle.initial_render();
			}
		});
		tracing::debug!(component = C::name(), "component created; first render deferred");

		handle
	}

	/// Current state snapshot.
	pub fn state(&self) -> Rc<State> {
		Rc::clone(&self.inner.core.borrow().state)
	}

	/// Current props snapshot.
	pub fn prop(&self) -> Rc<Props> {
		Rc::clone(&self.inner.core.borrow().prop)
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> LifecyclePhase {
		self.inner.core.borrow().lifecycle.phase()
	}

	/// Whether the first render has happened.
	pub fn is_mounted(&self) -> bool {
		self.inner.core.borrow().lifecycle.is_initialized()
	}

	/// Whether a state flush is queued but has not run yet.
	pub fn has_pending_update(&self) -> bool {
		self.inner.core.borrow().scheduler.is_pending()
	}

	/// Number of renders performed so far.
	pub fn render_count(&self) -> u64 {
		self.inner.core.borrow().lifecycle.renders()
	}

	/// Number of state batches opened so far.
	pub fn batch_count(&self) -> u64 {
		self.inner.core.borrow().scheduler.batches()
	}

	/// Merges `partial` into the state.
	///
	/// Only keys that already hold a defined value are written, and only when
	/// the new value differs. All calls made before the flush runs are
	/// applied together by a single deferred render.
	pub fn set_state<I, K, V>(&self, partial: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		let partial = collect_partial(partial);
		let stage = {
			let mut core = self.inner.core.borrow_mut();
			let Core {
				state, scheduler, ..
			} = &mut *core;
			scheduler.stage_state(state, partial)
		};

		if stage == StateStage::Opened {
			tracing::debug!(component = C::name(), "state batch opened; flush deferred");
			let weak = self.downgrade();
			queue_microtask(move || {
				if let Some(handle) = weak.upgrade() {
					handle.flush();
				}
			});
		}
	}

	/// Replaces the props with `partial`.
	///
	/// Keys not named in `partial` are dropped. If any named key changed, the
	/// new props are visible immediately. Without a pending state flush the
	/// component renders synchronously; otherwise the change is delivered
	/// with that flush's render. Called from one of the component's own hooks,
	/// the render runs as soon as the hook returns.
	///
	/// # Errors
	///
	/// [`ComponentError::ReentrantRender`] if a synchronous render is needed
	/// while this component's `render` is running. Nothing is applied in that
	/// case.
	pub fn set_prop<I, K, V>(&self, partial: I) -> ComponentResult<()>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		let partial = collect_partial(partial);
		let stage = {
			let mut core = self.inner.core.borrow_mut();
			let (next, previous) = core.prop.replace(partial);
			if previous.is_empty() {
				return Ok(());
			}
			if !core.scheduler.is_pending() && self.inner.rendering.get() {
				return Err(ComponentError::ReentrantRender {
					component: C::name(),
				});
			}
			core.prop = Rc::new(next);
			core.scheduler.stage_prop(previous)
		};

		match stage {
			PropStage::RenderNow(previous_prop) if self.is_busy() => {
				tracing::debug!(
					component = C::name(),
					"component busy; prop render runs once it is released"
				);
				self.owe(Owed::Render(previous_prop));
				Ok(())
			}
			PropStage::RenderNow(previous_prop) => {
				self.pre_render(PreviousValues::new(), previous_prop)
			}
			PropStage::Deferred => {
				tracing::debug!(
					component = C::name(),
					"prop change joined the pending state batch"
				);
				Ok(())
			}
		}
	}

	/// Runs `f` with shared access to the component value.
	///
	/// # Errors
	///
	/// [`ComponentError::ComponentBusy`] while the component is rendering.
	pub fn with_component<R>(&self, f: impl FnOnce(&C) -> R) -> ComponentResult<R> {
		let result = {
			let component = self.inner.component.try_borrow().map_err(|_| {
				ComponentError::ComponentBusy {
					component: C::name(),
				}
			})?;
			f(&component)
		};
		self.settle_owed();
		Ok(result)
	}

	/// Runs `f` with exclusive access to the component value.
	///
	/// Does not render; use it for wiring that happens outside the update
	/// cycle.
	///
	/// # Errors
	///
	/// [`ComponentError::ComponentBusy`] while the component is rendering.
	pub fn with_component_mut<R>(&self, f: impl FnOnce(&mut C) -> R) -> ComponentResult<R> {
		let result = {
			let mut component = self.inner.component.try_borrow_mut().map_err(|_| {
				ComponentError::ComponentBusy {
					component: C::name(),
				}
			})?;
			f(&mut component)
		};
		self.settle_owed();
		Ok(result)
	}

	/// Creates a non-owning handle.
	pub fn downgrade(&self) -> WeakHandle<C> {
		WeakHandle {
			inner: Rc::downgrade(&self.inner),
		}
	}

	/// Returns `true` if both handles refer to the same instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	fn is_busy(&self) -> bool {
		self.inner.component.try_borrow_mut().is_err()
	}

	fn owe(&self, owed: Owed) {
		self.inner.core.borrow_mut().owed.push_back(owed);
	}

	/// Runs owed work in arrival order until the queue is empty or the
	/// component is borrowed again.
	fn settle_owed(&self) {
		loop {
			if self.is_busy() {
				return;
			}
			let next = self.inner.core.borrow_mut().owed.pop_front();
			let Some(owed) = next else {
				return;
			};
			match owed {
				Owed::FirstRender => self.initial_render(),
				Owed::Render(previous_prop) => {
					if let Err(err) = self.pre_render(PreviousValues::new(), previous_prop) {
						tracing::warn!(component = C::name(), %err, "owed render skipped");
					}
				}
				Owed::Flush => self.flush(),
				Owed::Hook(hook) => self.run_hook(hook),
			}
		}
	}

	fn initial_render(&self) {
		if self.inner.core.borrow().lifecycle.is_initialized() {
			return;
		}
		if self.is_busy() {
			self.owe(Owed::FirstRender);
			return;
		}
		if let Err(err) = self.pre_render(PreviousValues::new(), PreviousValues::new()) {
			tracing::warn!(component = C::name(), %err, "first render skipped");
		}
	}

	fn flush(&self) {
		if self.is_busy() {
			tracing::debug!(
				component = C::name(),
				"component busy; flush runs once it is released"
			);
			self.owe(Owed::Flush);
			return;
		}

		let (previous_state, previous_prop) = {
			let mut core = self.inner.core.borrow_mut();
			let Some(Flush {
				state,
				previous_state,
				previous_prop,
			}) = core.scheduler.take_flush()
			else {
				return;
			};
			core.state = Rc::new(state);
			(previous_state, previous_prop)
		};

		tracing::debug!(
			component = C::name(),
			changed = previous_state.len(),
			"flushing state batch"
		);
		if let Err(err) = self.pre_render(previous_state, previous_prop) {
			tracing::warn!(component = C::name(), %err, "flushed state was not rendered");
		}
	}

	fn pre_render(
		&self,
		previous_state: PreviousValues,
		previous_prop: PreviousValues,
	) -> ComponentResult<()> {
		{
			let mut component = self.inner.component.try_borrow_mut().map_err(|_| {
				ComponentError::ReentrantRender {
					component: C::name(),
				}
			})?;

			let hook = self
				.inner
				.core
				.borrow_mut()
				.lifecycle
				.begin_render(previous_state, previous_prop);
			let weak = self.downgrade();
			queue_microtask(move || {
				if let Some(handle) = weak.upgrade() {
					handle.run_hook(hook);
				}
			});

			tracing::debug!(component = C::name(), "rendering");
			let _rendering = RenderGuard::enter(&self.inner.rendering);
			component.render(&Context::new(self.clone()));
		}
		self.settle_owed();
		Ok(())
	}

	fn run_hook(&self, hook: Hook) {
		{
			let Ok(mut component) = self.inner.component.try_borrow_mut() else {
				tracing::debug!(
					component = C::name(),
					"component busy; hook runs once it is released"
				);
				self.owe(Owed::Hook(hook));
				return;
			};
			hook.dispatch(&mut *component, &Context::new(self.clone()));
		}
		self.settle_owed();
	}
}

impl<C: Component> Clone for ComponentHandle<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<C: Component> fmt::Debug for ComponentHandle<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let core = self.inner.core.borrow();
		f.debug_struct("ComponentHandle")
			.field("component", &C::name())
			.field("phase", &core.lifecycle.phase())
			.field("pending", &core.scheduler.is_pending())
			.finish()
	}
}

/// Non-owning handle to a component instance.
///
/// Use it to reach a component from callbacks it hands to children without
/// creating a reference cycle.
pub struct WeakHandle<C: Component> {
	inner: Weak<Instance<C>>,
}

impl<C: Component> WeakHandle<C> {
	/// Returns an owning handle if the instance is still alive.
	pub fn upgrade(&self) -> Option<ComponentHandle<C>> {
		self.inner
			.upgrade()
			.map(|inner| ComponentHandle { inner })
	}

	/// Wraps `f` in a [`Callback`](crate::Callback) that runs only while the
	/// instance is alive.
	pub fn callback<F>(&self, f: F) -> crate::Callback
	where
		F: Fn(&ComponentHandle<C>, Value) + 'static,
	{
		let weak = self.clone();
		crate::Callback::new(move |value| {
			if let Some(handle) = weak.upgrade() {
				f(&handle, value);
			}
		})
	}
}

impl<C: Component> Clone for WeakHandle<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<C: Component> fmt::Debug for WeakHandle<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakHandle")
			.field("component", &C::name())
			.field("alive", &(self.inner.strong_count() > 0))
			.finish()
	}
}

/// Access to a component's own data from `render` and the hooks.
pub struct Context<C: Component> {
	handle: ComponentHandle<C>,
}

impl<C: Component> Context<C> {
	fn new(handle: ComponentHandle<C>) -> Self {
		Self { handle }
	}

	/// Current state snapshot.
	pub fn state(&self) -> Rc<State> {
		self.handle.state()
	}

	/// Current props snapshot.
	pub fn prop(&self) -> Rc<Props> {
		self.handle.prop()
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> LifecyclePhase {
		self.handle.phase()
	}

	/// Same as [`ComponentHandle::set_state`].
	pub fn set_state<I, K, V>(&self, partial: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		self.handle.set_state(partial);
	}

	/// Same as [`ComponentHandle::set_prop`]. A change that needs a
	/// synchronous render fails with [`ComponentError::ReentrantRender`].
	pub fn set_prop<I, K, V>(&self, partial: I) -> ComponentResult<()>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		self.handle.set_prop(partial)
	}

	/// Non-owning handle to this component, for callbacks.
	pub fn handle(&self) -> WeakHandle<C> {
		self.handle.downgrade()
	}
}
