//! Integration tests for update scheduling
//!
//! These tests verify:
//! 1. State mutations in one synchronous segment coalesce into one render
//! 2. Property changes render synchronously unless a state batch is pending
//! 3. Exactly one lifecycle hook follows each render, in its own continuation
//! 4. No-op mutations schedule nothing

use rstest::rstest;
use serial_test::serial;
use statewise_component::{
	Component, ComponentError, ComponentHandle, Context, LifecyclePhase, PreviousValues, Props,
	State, Value, values,
};
use statewise_runtime::{pending_tasks, queue_microtask, run_until_idle};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Event {
	Render { state: State, prop: Props },
	Mount,
	Update {
		previous_state: PreviousValues,
		previous_prop: PreviousValues,
	},
	External,
}

type Log = Rc<RefCell<Vec<Event>>>;

/// Logs every render and hook
struct Recorder {
	log: Log,
	/// State written by `on_mount`
	mount_writes: Vec<(String, Value)>,
}

impl Component for Recorder {
	fn render(&mut self, cx: &Context<Self>) {
		self.log.borrow_mut().push(Event::Render {
			state: (*cx.state()).clone(),
			prop: (*cx.prop()).clone(),
		});
	}

	fn on_mount(&mut self, cx: &Context<Self>) {
		self.log.borrow_mut().push(Event::Mount);
		cx.set_state(self.mount_writes.clone());
	}

	fn on_update(
		&mut self,
		_cx: &Context<Self>,
		previous_state: &PreviousValues,
		previous_prop: &PreviousValues,
	) {
		self.log.borrow_mut().push(Event::Update {
			previous_state: previous_state.clone(),
			previous_prop: previous_prop.clone(),
		});
	}
}

fn recorder(state: State) -> (ComponentHandle<Recorder>, Log) {
	let log = Log::default();
	let handle = ComponentHandle::new(
		Recorder {
			log: log.clone(),
			mount_writes: Vec::new(),
		},
		state,
	);
	(handle, log)
}

/// Creates a recorder, mounts it and clears the log
fn mounted(state: State) -> (ComponentHandle<Recorder>, Log) {
	let (handle, log) = recorder(state);
	run_until_idle().unwrap();
	log.borrow_mut().clear();
	(handle, log)
}

fn previous(pairs: &[(&str, Value)]) -> PreviousValues {
	let mut map = PreviousValues::new();
	for (key, value) in pairs {
		map.record(*key, value.clone());
	}
	map
}

fn take(log: &Log) -> Vec<Event> {
	log.borrow_mut().drain(..).collect()
}

#[rstest]
#[serial]
fn test_mount_follows_first_render() {
	let (handle, log) = recorder(State::from_iter([("count", 0)]));
	assert!(take(&log).is_empty());

	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![
			Event::Render {
				state: State::from_iter([("count", 0)]),
				prop: Props::new(),
			},
			Event::Mount,
		]
	);
	assert_eq!(handle.phase(), LifecyclePhase::Mounted);
}

#[rstest]
#[serial]
fn test_state_updates_coalesce() {
	let (handle, log) = mounted(State::from_iter([("count", 0)]));

	handle.set_state(values! { "count" => 1 });
	handle.set_state(values! { "count" => 2 });

	// Nothing renders inside the synchronous segment.
	assert!(take(&log).is_empty());
	assert_eq!(handle.state().get("count"), Some(&Value::from(0)));
	assert!(handle.has_pending_update());

	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![
			Event::Render {
				state: State::from_iter([("count", 2)]),
				prop: Props::new(),
			},
			Event::Update {
				previous_state: previous(&[("count", Value::from(0))]),
				previous_prop: PreviousValues::new(),
			},
		]
	);
	assert_eq!(handle.batch_count(), 1);
	assert!(!handle.has_pending_update());
}

#[rstest]
#[serial]
fn test_batches_are_separated_by_drains() {
	let (handle, log) = mounted(State::from_iter([("count", 0)]));

	handle.set_state(values! { "count" => 1 });
	run_until_idle().unwrap();
	handle.set_state(values! { "count" => 2 });
	run_until_idle().unwrap();

	let updates: Vec<_> = take(&log)
		.into_iter()
		.filter(|event| matches!(event, Event::Update { .. }))
		.collect();
	assert_eq!(
		updates,
		vec![
			Event::Update {
				previous_state: previous(&[("count", Value::from(0))]),
				previous_prop: PreviousValues::new(),
			},
			Event::Update {
				previous_state: previous(&[("count", Value::from(1))]),
				previous_prop: PreviousValues::new(),
			},
		]
	);
	assert_eq!(handle.batch_count(), 2);
}

#[rstest]
#[serial]
fn test_prop_change_renders_synchronously() {
	let (handle, log) = mounted(State::new());

	handle.set_prop(values! { "value" => "a" }).unwrap();

	assert_eq!(
		take(&log),
		vec![Event::Render {
			state: State::new(),
			prop: Props::from_iter([("value", "a")]),
		}]
	);

	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![Event::Update {
			previous_state: PreviousValues::new(),
			previous_prop: previous(&[("value", Value::Undefined)]),
		}]
	);
}

#[rstest]
#[serial]
fn test_hook_runs_behind_earlier_continuations() {
	let (handle, log) = mounted(State::new());

	let external = log.clone();
	queue_microtask(move || external.borrow_mut().push(Event::External));
	handle.set_prop(values! { "value" => 1 }).unwrap();
	run_until_idle().unwrap();

	let events = take(&log);
	assert!(matches!(events[0], Event::Render { .. }));
	assert_eq!(events[1], Event::External);
	assert!(matches!(events[2], Event::Update { .. }));
}

#[rstest]
#[serial]
fn test_prop_change_rides_along_with_pending_batch() {
	let (handle, log) = mounted(State::from_iter([("x", 0)]));

	handle.set_state(values! { "x" => 1 });
	handle.set_prop(values! { "y" => 1 }).unwrap();

	// The prop is visible at once but does not render on its own.
	assert!(take(&log).is_empty());
	assert_eq!(handle.prop().get("y"), Some(&Value::from(1)));

	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![
			Event::Render {
				state: State::from_iter([("x", 1)]),
				prop: Props::from_iter([("y", 1)]),
			},
			Event::Update {
				previous_state: previous(&[("x", Value::from(0))]),
				previous_prop: previous(&[("y", Value::Undefined)]),
			},
		]
	);
	assert_eq!(handle.render_count(), 2);
}

#[rstest]
#[serial]
fn test_ride_along_keeps_first_previous_prop() {
	let (handle, log) = mounted(State::from_iter([("x", 0)]));

	handle.set_state(values! { "x" => 1 });
	handle.set_prop(values! { "y" => "first" }).unwrap();
	handle.set_prop(values! { "y" => "second" }).unwrap();
	run_until_idle().unwrap();

	assert_eq!(
		take(&log).last(),
		Some(&Event::Update {
			previous_state: previous(&[("x", Value::from(0))]),
			previous_prop: previous(&[("y", Value::Undefined)]),
		})
	);
	assert_eq!(handle.prop().get("y"), Some(&Value::from("second")));
}

#[rstest]
#[serial]
fn test_state_batch_opened_after_prop_render() {
	let (handle, log) = mounted(State::from_iter([("x", 0)]));

	handle.set_prop(values! { "y" => 1 }).unwrap();
	handle.set_state(values! { "x" => 1 });
	run_until_idle().unwrap();

	let updates: Vec<_> = take(&log)
		.into_iter()
		.filter(|event| matches!(event, Event::Update { .. }))
		.collect();
	assert_eq!(
		updates,
		vec![
			Event::Update {
				previous_state: PreviousValues::new(),
				previous_prop: previous(&[("y", Value::Undefined)]),
			},
			Event::Update {
				previous_state: previous(&[("x", Value::from(0))]),
				previous_prop: PreviousValues::new(),
			},
		]
	);
}

#[rstest]
#[case::same_value(values! { "count" => 0 })]
#[case::unknown_key(values! { "missing" => 1 })]
#[case::undefined_key(values! { "note" => "text" })]
#[case::empty(values! {})]
#[serial]
fn test_ignored_state_writes_schedule_nothing(#[case] partial: Vec<(String, Value)>) {
	let (handle, log) = mounted(State::from_iter([
		("count", Value::from(0)),
		("note", Value::Undefined),
	]));

	handle.set_state(partial);

	assert!(!handle.has_pending_update());
	assert_eq!(pending_tasks(), 0);
	assert_eq!(run_until_idle(), Ok(0));
	assert!(take(&log).is_empty());
	assert!(!handle.state().contains_key("missing"));
}

#[rstest]
#[serial]
fn test_unchanged_props_do_not_render() {
	let (handle, log) = mounted(State::new());
	handle.set_prop(values! { "value" => "a" }).unwrap();
	run_until_idle().unwrap();
	take(&log);

	handle.set_prop(values! { "value" => "a" }).unwrap();
	handle.set_prop(values! {}).unwrap();

	assert_eq!(pending_tasks(), 0);
	assert!(take(&log).is_empty());
}

#[rstest]
#[serial]
fn test_nan_always_counts_as_change() {
	let (handle, log) = mounted(State::new());

	handle.set_prop(values! { "ratio" => f64::NAN }).unwrap();
	handle.set_prop(values! { "ratio" => f64::NAN }).unwrap();
	run_until_idle().unwrap();

	let renders = take(&log)
		.into_iter()
		.filter(|event| matches!(event, Event::Render { .. }))
		.count();
	assert_eq!(renders, 2);
}

#[rstest]
#[serial]
fn test_null_state_is_updatable_and_undefined_retires_key() {
	let (handle, _log) = mounted(State::from_iter([("slot", Value::Null)]));

	handle.set_state(values! { "slot" => 1 });
	run_until_idle().unwrap();
	assert_eq!(handle.state().get("slot"), Some(&Value::from(1)));

	handle.set_state([("slot", Value::Undefined)]);
	run_until_idle().unwrap();
	assert!(!handle.state().is_defined("slot"));

	handle.set_state(values! { "slot" => 2 });
	assert!(!handle.has_pending_update());
}

#[rstest]
#[serial]
fn test_hook_mutation_starts_new_batch() {
	let log = Log::default();
	let handle = ComponentHandle::new(
		Recorder {
			log: log.clone(),
			mount_writes: values! { "count" => 1 },
		},
		State::from_iter([("count", 0)]),
	);

	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![
			Event::Render {
				state: State::from_iter([("count", 0)]),
				prop: Props::new(),
			},
			Event::Mount,
			Event::Render {
				state: State::from_iter([("count", 1)]),
				prop: Props::new(),
			},
			Event::Update {
				previous_state: previous(&[("count", Value::from(0))]),
				previous_prop: PreviousValues::new(),
			},
		]
	);
	assert_eq!(handle.render_count(), 2);
}

#[rstest]
#[serial]
fn test_initial_props_are_not_reported_as_changes() {
	let log = Log::default();
	let handle = ComponentHandle::with_props(
		Recorder {
			log: log.clone(),
			mount_writes: Vec::new(),
		},
		State::new(),
		Props::from_iter([("value", "a")]),
	);
	run_until_idle().unwrap();
	take(&log);

	handle.set_prop(values! { "value" => "b" }).unwrap();
	run_until_idle().unwrap();

	assert_eq!(
		take(&log).last(),
		Some(&Event::Update {
			previous_state: PreviousValues::new(),
			previous_prop: previous(&[("value", Value::from("a"))]),
		})
	);
}

/// Calls `set_prop` on itself while rendering
#[derive(Default)]
struct SelfRenderer {
	outcomes: Vec<Result<(), ComponentError>>,
}

impl Component for SelfRenderer {
	fn render(&mut self, cx: &Context<Self>) {
		let attempt = self.outcomes.len();
		self.outcomes.push(cx.set_prop([("attempt", attempt)]));
	}
}

#[rstest]
#[serial]
fn test_synchronous_render_from_render_is_refused() {
	let handle = ComponentHandle::new(SelfRenderer::default(), State::new());
	run_until_idle().unwrap();

	let outcomes = handle.with_component(|c| c.outcomes.clone()).unwrap();
	assert_eq!(
		outcomes,
		vec![Err(ComponentError::ReentrantRender {
			component: "SelfRenderer",
		})]
	);
	assert!(!handle.prop().contains_key("attempt"));
	assert_eq!(handle.render_count(), 1);
}

#[rstest]
#[serial]
fn test_dropped_component_is_not_kept_alive_by_queue() {
	let (handle, log) = mounted(State::from_iter([("count", 0)]));
	let weak = handle.downgrade();

	handle.set_state(values! { "count" => 1 });
	drop(handle);

	assert!(weak.upgrade().is_none());
	assert_eq!(run_until_idle(), Ok(1));
	assert!(take(&log).is_empty());
}

/// Hands itself a prop from `on_mount`
#[derive(Default)]
struct ReadyOnMount {
	log: Vec<&'static str>,
	/// Render counts seen by a continuation queued from `on_mount`
	marker: Rc<RefCell<Vec<u64>>>,
	outcome: Option<Result<(), ComponentError>>,
	previous_prop: Option<PreviousValues>,
}

impl Component for ReadyOnMount {
	fn render(&mut self, cx: &Context<Self>) {
		let ready = cx.prop().get_as::<bool>("ready").unwrap_or(false);
		self.log.push(if ready { "render ready" } else { "render" });
	}

	fn on_mount(&mut self, cx: &Context<Self>) {
		self.log.push("mount");
		let marker = self.marker.clone();
		let this = cx.handle();
		queue_microtask(move || {
			if let Some(this) = this.upgrade() {
				marker.borrow_mut().push(this.render_count());
			}
		});
		self.outcome = Some(cx.set_prop(values! { "ready" => true }));
	}

	fn on_update(
		&mut self,
		_cx: &Context<Self>,
		_previous_state: &PreviousValues,
		previous_prop: &PreviousValues,
	) {
		self.log.push("update");
		self.previous_prop = Some(previous_prop.clone());
	}
}

#[rstest]
#[serial]
fn test_prop_set_from_own_hook_renders_after_hook_returns() {
	let marker = Rc::new(RefCell::new(Vec::new()));
	let handle = ComponentHandle::new(
		ReadyOnMount {
			marker: marker.clone(),
			..Default::default()
		},
		State::new(),
	);

	run_until_idle().unwrap();

	assert_eq!(handle.prop().get("ready"), Some(&Value::from(true)));
	assert_eq!(handle.render_count(), 2);
	handle
		.with_component(|c| {
			assert_eq!(c.outcome, Some(Ok(())));
			assert_eq!(c.log, vec!["render", "mount", "render ready", "update"]);
			assert_eq!(
				c.previous_prop,
				Some(previous(&[("ready", Value::Undefined)]))
			);
		})
		.unwrap();
	// The render ran inside the hook's continuation, ahead of the
	// continuation `on_mount` queued before calling `set_prop`.
	assert_eq!(*marker.borrow(), vec![2]);
}

#[rstest]
#[serial]
fn test_flush_waits_for_component_to_be_released() {
	let (handle, log) = mounted(State::from_iter([("count", 0)]));

	handle.set_state(values! { "count" => 1 });
	let drained = handle.with_component(|_| run_until_idle()).unwrap();

	// The flush found the component borrowed and kept the batch.
	assert_eq!(drained, Ok(1));

	// Released: the batch renders, and its hook follows on the next drain.
	assert_eq!(handle.state().get("count"), Some(&Value::from(1)));
	run_until_idle().unwrap();

	assert_eq!(
		take(&log),
		vec![
			Event::Render {
				state: State::from_iter([("count", 1)]),
				prop: Props::new(),
			},
			Event::Update {
				previous_state: previous(&[("count", Value::from(0))]),
				previous_prop: PreviousValues::new(),
			},
		]
	);
	assert!(!handle.has_pending_update());
}

#[rstest]
#[serial]
fn test_first_render_waits_for_component_to_be_released() {
	let (handle, log) = recorder(State::new());

	handle.with_component(|_| run_until_idle()).unwrap().unwrap();
	assert_eq!(handle.render_count(), 1);

	run_until_idle().unwrap();
	assert_eq!(take(&log).last(), Some(&Event::Mount));
}

#[rstest]
#[serial]
fn test_prop_update_replaces_previous_props() {
	let log = Log::default();
	let handle = ComponentHandle::with_props(
		Recorder {
			log: log.clone(),
			mount_writes: Vec::new(),
		},
		State::new(),
		Props::from_iter([("a", 1), ("b", 2)]),
	);
	run_until_idle().unwrap();
	take(&log);

	handle.set_prop(values! { "a" => 3 }).unwrap();

	assert_eq!(handle.prop().keys().collect::<Vec<_>>(), vec!["a"]);
	run_until_idle().unwrap();
	assert_eq!(
		take(&log).last(),
		Some(&Event::Update {
			previous_state: PreviousValues::new(),
			previous_prop: previous(&[("a", Value::from(1))]),
		})
	);
}
