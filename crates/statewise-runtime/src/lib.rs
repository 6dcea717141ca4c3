//! Statewise Runtime - Single-threaded Continuation Queue
//!
//! The deferred-execution layer underneath `statewise-component`. Everything a
//! component defers (its first render, a batched state flush, a lifecycle
//! hook) is queued here as a continuation and runs strictly in FIFO order once
//! the current synchronous call segment has finished.
//!
//! ## Modules
//!
//! - [`runtime`]: the thread-local queue, drain loop and host scheduler hook
//! - [`config`]: drain limits, loadable from TOML
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use statewise_runtime::{pending_tasks, queue_microtask, run_until_idle};
//!
//! queue_microtask(|| println!("deferred"));
//! assert_eq!(pending_tasks(), 1);
//!
//! assert_eq!(run_until_idle(), Ok(1));
//! assert_eq!(pending_tasks(), 0);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod runtime;

pub use config::RuntimeConfig;
pub use error::{ConfigError, RuntimeError, RuntimeResult};
pub use runtime::{
	Runtime, configure, has_scheduler, pending_tasks, queue_microtask, run_until_idle,
	set_scheduler, try_with_runtime, with_runtime,
};
