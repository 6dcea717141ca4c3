//! Continuation Runtime
//!
//! This module provides the single-threaded queue of deferred continuations
//! that component updates are scheduled on.
//!
//! ## Architecture
//!
//! 1. **FIFO Queue**: Continuations run strictly in the order they were queued
//! 2. **Run to Completion**: A continuation is never interrupted by another one
//! 3. **Drain Semantics**: Continuations queued while draining run in the same drain
//! 4. **Host Integration**: An optional scheduler hook arms a drain whenever the
//!    queue becomes non-empty (e.g. `wasm_bindgen_futures::spawn_local`)
//!
//! Without a scheduler hook the host calls [`run_until_idle`] after each
//! synchronous call segment.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use statewise_runtime::{queue_microtask, run_until_idle};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let first = log.clone();
//! queue_microtask(move || first.borrow_mut().push("first"));
//! let second = log.clone();
//! queue_microtask(move || second.borrow_mut().push("second"));
//! log.borrow_mut().push("sync");
//!
//! run_until_idle().unwrap();
//! assert_eq!(*log.borrow(), vec!["sync", "first", "second"]);
//! ```

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::OnceLock;

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};

/// A queued continuation
type Task = Box<dyn FnOnce() + 'static>;

/// Type for the host scheduler function
type SchedulerFn = Box<dyn Fn(Box<dyn FnOnce() + Send>) + Send + Sync>;

/// Global scheduler function
static SCHEDULER: OnceLock<SchedulerFn> = OnceLock::new();

/// Set the global scheduler used to arm a drain of the continuation queue.
///
/// This should be called once at application startup. The hook receives a
/// closure that drains the calling thread's queue; it is invoked whenever a
/// continuation is queued onto an empty, idle queue. Returns `false` if a
/// scheduler was already installed.
///
/// ```ignore
/// // In WASM environment
/// statewise_runtime::set_scheduler(|drain| {
///     wasm_bindgen_futures::spawn_local(async move { drain() });
/// });
/// ```
pub fn set_scheduler<F>(scheduler: F) -> bool
where
	F: Fn(Box<dyn FnOnce() + Send>) + Send + Sync + 'static,
{
	SCHEDULER.set(Box::new(scheduler)).is_ok()
}

/// Whether a host scheduler has been installed.
pub fn has_scheduler() -> bool {
	SCHEDULER.get().is_some()
}

fn arm_scheduler() {
	if let Some(scheduler) = SCHEDULER.get() {
		tracing::trace!("arming host drain");
		scheduler(Box::new(|| {
			if let Some(Err(err)) = try_with_runtime(|rt| rt.run_until_idle()) {
				tracing::debug!(%err, "host drain ended early");
			}
		}));
	}
}

/// Resets the draining flag when a drain ends, including by unwinding.
struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// Per-thread continuation runtime
///
/// Owns the FIFO queue of pending continuations. It uses thread-local
/// storage, so every thread has an independent queue.
pub struct Runtime {
	/// Pending continuations, front runs first
	queue: RefCell<VecDeque<Task>>,
	/// Whether a drain is currently running
	draining: Cell<bool>,
	/// Drain limits
	config: RefCell<RuntimeConfig>,
}

impl Runtime {
	/// Create a new Runtime with the default configuration
	pub fn new() -> Self {
		Self::with_config(RuntimeConfig::default())
	}

	/// Create a new Runtime with the given configuration
	pub fn with_config(config: RuntimeConfig) -> Self {
		Self {
			queue: RefCell::new(VecDeque::new()),
			draining: Cell::new(false),
			config: RefCell::new(config),
		}
	}

	/// Replace the configuration applied to subsequent drains
	pub fn set_config(&self, config: RuntimeConfig) {
		*self.config.borrow_mut() = config;
	}

	/// Current configuration
	pub fn config(&self) -> RuntimeConfig {
		self.config.borrow().clone()
	}

	/// Append a continuation to the back of the queue
	pub fn enqueue(&self, task: Task) {
		let was_idle = {
			let mut queue = self.queue.borrow_mut();
			let was_empty = queue.is_empty();
			queue.push_back(task);
			tracing::trace!(pending = queue.len(), "continuation queued");
			was_empty && !self.draining.get()
		};

		if was_idle {
			arm_scheduler();
		}
	}

	/// Number of continuations waiting to run
	pub fn pending_tasks(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Whether a drain is currently running on this runtime
	pub fn is_draining(&self) -> bool {
		self.draining.get()
	}

	/// Run queued continuations in FIFO order until the queue is empty.
	///
	/// Continuations queued by a running continuation are picked up by the
	/// same drain. Returns the number of continuations executed.
	///
	/// # Errors
	///
	/// - [`RuntimeError::ReentrantDrain`] when called from inside a continuation.
	/// - [`RuntimeError::BudgetExhausted`] when `max_tasks_per_drain` is reached
	///   with work still queued; that work stays queued.
	pub fn run_until_idle(&self) -> RuntimeResult<usize> {
		if self.draining.replace(true) {
			return Err(RuntimeError::ReentrantDrain);
		}

		let (budget, warn) = {
			let config = self.config.borrow();
			(config.max_tasks_per_drain(), config.warn_on_budget_exhausted())
		};

		let outcome = {
			let _guard = DrainGuard(&self.draining);
			let mut executed = 0;
			loop {
				if executed >= budget {
					let remaining = self.pending_tasks();
					if remaining == 0 {
						break Ok(executed);
					}
					break Err(RuntimeError::BudgetExhausted {
						executed,
						remaining,
					});
				}

				// The queue borrow must end before the continuation runs.
				let Some(task) = self.queue.borrow_mut().pop_front() else {
					break Ok(executed);
				};
				task();
				executed += 1;
			}
		};

		match &outcome {
			Ok(executed) => tracing::trace!(executed, "continuation queue idle"),
			Err(RuntimeError::BudgetExhausted {
				executed,
				remaining,
			}) => {
				if warn {
					tracing::warn!(
						executed,
						remaining,
						"drain budget exhausted; remaining continuations deferred"
					);
				}
				arm_scheduler();
			}
			Err(_) => {}
		}

		outcome
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

// Thread-local runtime instance
//
// In WASM, there is only one thread, so this effectively provides a global runtime.
// On non-WASM platforms, each thread gets its own runtime instance.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```
/// use statewise_runtime::with_runtime;
///
/// let pending = with_runtime(|rt| rt.pending_tasks());
/// assert_eq!(pending, 0);
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the thread's runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Queue a continuation on the thread's runtime.
///
/// The continuation runs after the current synchronous segment, behind every
/// continuation queued before it.
pub fn queue_microtask<F>(task: F)
where
	F: FnOnce() + 'static,
{
	with_runtime(|rt| rt.enqueue(Box::new(task)));
}

/// Drain the thread's continuation queue. See [`Runtime::run_until_idle`].
pub fn run_until_idle() -> RuntimeResult<usize> {
	with_runtime(|rt| rt.run_until_idle())
}

/// Number of continuations queued on the thread's runtime.
pub fn pending_tasks() -> usize {
	with_runtime(|rt| rt.pending_tasks())
}

/// Replace the configuration of the thread's runtime.
pub fn configure(config: RuntimeConfig) {
	with_runtime(|rt| rt.set_config(config));
}
