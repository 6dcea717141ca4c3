//! Update Scheduler
//!
//! Per-instance bookkeeping that coalesces mutations into batches.
//!
//! ## Batching rules
//!
//! 1. **One flush per batch**: the first `set_state` call that changes a value
//!    opens a batch and asks the caller to queue exactly one flush
//! 2. **Merging**: later calls before the flush write into the same pending
//!    state and extend (never overwrite) the previous-value snapshot
//! 3. **Ride-along props**: a property change arriving while a batch is open
//!    is folded into that batch instead of rendering on its own
//!
//! The scheduler only records; queueing the flush continuation and running
//! the render are done by [`ComponentHandle`](crate::ComponentHandle).

use crate::previous::PreviousValues;
use crate::state::State;
use crate::value::Value;

/// Result of staging a `set_state` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateStage {
	/// No value changed and no batch is open.
	Unchanged,
	/// A new batch was opened; the caller must queue its flush.
	Opened,
	/// The call was merged into the open batch.
	Merged,
}

/// Result of staging a `set_prop` change.
#[derive(Debug, PartialEq)]
pub(crate) enum PropStage {
	/// No batch is open; render now with these previous props.
	RenderNow(PreviousValues),
	/// The change will be delivered by the open batch's flush.
	Deferred,
}

/// Everything a flush needs to apply a batch and render it.
#[derive(Debug)]
pub(crate) struct Flush {
	pub(crate) state: State,
	pub(crate) previous_state: PreviousValues,
	pub(crate) previous_prop: PreviousValues,
}

/// An open batch
#[derive(Debug)]
struct PendingUpdate {
	/// Accumulated state, installed wholesale by the flush
	state: State,
	/// Batch-start values of every key written in this batch
	previous_state: PreviousValues,
	/// Previous props of changes that arrived while the batch was open
	previous_prop: Option<PreviousValues>,
}

/// Pending-update record of one component instance.
#[derive(Debug, Default)]
pub(crate) struct UpdateScheduler {
	pending: Option<PendingUpdate>,
	batches: u64,
}

impl UpdateScheduler {
	/// Whether a flush is queued but has not run yet.
	pub(crate) fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Number of batches opened so far.
	pub(crate) fn batches(&self) -> u64 {
		self.batches
	}

	/// Stages a state update against `current`, the state visible right now.
	pub(crate) fn stage_state<I>(&mut self, current: &State, partial: I) -> StateStage
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		if let Some(pending) = self.pending.as_mut() {
			pending
				.state
				.merge_guarded(partial, current, &mut pending.previous_state);
			return StateStage::Merged;
		}

		let mut state = current.clone();
		let mut previous_state = PreviousValues::new();
		if state.merge_guarded(partial, current, &mut previous_state) == 0 {
			return StateStage::Unchanged;
		}

		self.pending = Some(PendingUpdate {
			state,
			previous_state,
			previous_prop: None,
		});
		self.batches += 1;
		StateStage::Opened
	}

	/// Stages a property change that has already been applied to the visible
	/// props. `previous` must not be empty.
	pub(crate) fn stage_prop(&mut self, previous: PreviousValues) -> PropStage {
		match self.pending.as_mut() {
			Some(pending) => {
				pending
					.previous_prop
					.get_or_insert_with(PreviousValues::new)
					.extend_from(previous);
				PropStage::Deferred
			}
			None => PropStage::RenderNow(previous),
		}
	}

	/// Closes the open batch, if any.
	pub(crate) fn take_flush(&mut self) -> Option<Flush> {
		self.pending.take().map(|pending| Flush {
			state: pending.state,
			previous_state: pending.previous_state,
			previous_prop: pending.previous_prop.unwrap_or_default(),
		})
	}
}
