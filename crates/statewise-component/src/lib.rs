//! Statewise Component - Stateful Component Base
//!
//! A minimal base for UI components. A component owns a fixed set of state
//! values and receives an open set of properties from its owner. State
//! mutations are coalesced into one deferred render per batch; property
//! changes render synchronously unless they can ride along with a pending
//! batch. After every render exactly one lifecycle hook runs: `on_mount`
//! after the first render and `on_update` after every later one, each
//! receiving the batch-start values of what changed.
//!
//! Deferred work runs on the continuation queue of `statewise-runtime`, so a
//! host drives it with [`statewise_runtime::run_until_idle`] or installs a
//! scheduler hook.
//!
//! ## Modules
//!
//! - [`component`]: the [`Component`] trait, handles and render context
//! - [`value`]: dynamically typed values and callbacks
//! - [`state`], [`props`]: the two value containers
//! - [`previous`]: previous-value maps handed to `on_update`
//! - [`lifecycle`]: lifecycle phases
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use statewise_component::{Component, ComponentHandle, Context, PreviousValues, State, values};
//! use statewise_runtime::run_until_idle;
//!
//! #[derive(Default)]
//! struct Greeting {
//!     updates: usize,
//! }
//!
//! impl Component for Greeting {
//!     fn render(&mut self, cx: &Context<Self>) {
//!         let name = cx.prop().get_as::<String>("name").unwrap_or_default();
//!         println!("hello, {name}");
//!     }
//!
//!     fn on_update(&mut self, _cx: &Context<Self>, _: &PreviousValues, _: &PreviousValues) {
//!         self.updates += 1;
//!     }
//! }
//!
//! let greeting = ComponentHandle::new(Greeting::default(), State::new());
//! run_until_idle().unwrap();
//!
//! greeting.set_prop(values! { "name" => "world" }).unwrap();
//! run_until_idle().unwrap();
//!
//! assert_eq!(greeting.render_count(), 2);
//! assert_eq!(greeting.with_component(|g| g.updates).unwrap(), 1);
//! ```

#![warn(missing_docs)]

pub mod component;
pub mod error;
pub mod lifecycle;
mod macros;
mod map;
pub mod previous;
pub mod props;
mod scheduler;
pub mod state;
pub mod value;

pub use component::{Component, ComponentHandle, Context, WeakHandle};
pub use error::{ComponentError, ComponentResult};
pub use lifecycle::LifecyclePhase;
pub use map::ValueMap;
pub use previous::{PreviousValues, has_some_prop};
pub use props::Props;
pub use state::State;
pub use value::{Callback, FromValue, Value};
