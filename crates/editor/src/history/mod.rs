//! Undo history for a document.
//!
//! History stores inverted steps rather than document snapshots: each entry
//! holds the steps that undo an edit and the steps that redo it, plus the
//! selections to restore on either side. Undo and redo hand back a
//! transaction for the caller to dispatch; those transactions are flagged so
//! they are not recorded again.


use tagpad_primitives::{Selection, Step};
use tracing::{debug, warn};

use crate::state::EditorState;
use crate::transaction::Transaction;

/// History commands that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
	/// Undo the last edit.
	Undo,
	/// Redo the last undone edit.
	Redo,
}

/// Default maximum undo history size.
pub const MAX_UNDO: usize = 100;

/// One recorded edit.
#[derive(Debug, Clone)]
pub struct HistoryStep {
	/// Steps reversing the edit, in application order.
	pub undo_steps: Vec<Step>,
	/// Steps re-applying the edit, in application order.
	pub redo_steps: Vec<Step>,
	/// Selection before the edit.
	pub selection_before: Selection,
	/// Selection after the edit.
	pub selection_after: Selection,
}

/// Bounded undo/redo stacks.
#[derive(Debug)]
pub struct History {
	undo_stack: Vec<HistoryStep>,
	redo_stack: Vec<HistoryStep>,
	depth: usize,
}

impl Default for History {
	fn default() -> Self {
		Self::new(MAX_UNDO)
	}
}

impl History {
	/// Creates an empty history keeping at most `depth` undo entries.
	pub fn new(depth: usize) -> Self {
		Self {
			undo_stack: Vec::new(),
			redo_stack: Vec::new(),
			depth: depth.max(1),
		}
	}

	/// Returns whether undo is available.
	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Returns the undo stack length.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Returns the redo stack length.
	pub fn redo_len(&self) -> usize {
		self.redo_stack.len()
	}

	/// Clears the redo stack (called after a new edit).
	pub fn clear_redo(&mut self) {
		self.redo_stack.clear();
	}

	/// Records a transaction applied to `before`.
	///
	/// Transactions that change nothing or opted out of history are skipped.
	/// The oldest entry is dropped once the configured depth is exceeded.
	pub fn record_transaction(&mut self, tr: &Transaction, before: &EditorState) {
		if !tr.doc_changed() || !tr.add_to_history() {
			return;
		}
		let mut undo_steps = Vec::with_capacity(tr.steps().len());
		for (step, doc) in tr.steps().iter().zip(tr.docs()).rev() {
			match step.invert(doc) {
				Ok(inverse) => undo_steps.push(inverse),
				Err(err) => {
					warn!(%err, "cannot invert step, dropping history");
					self.undo_stack.clear();
					self.redo_stack.clear();
					return;
				}
			}
		}
		self.undo_stack.push(HistoryStep {
			undo_steps,
			redo_steps: tr.steps().to_vec(),
			selection_before: before.selection(),
			selection_after: tr.selection(),
		});
		self.redo_stack.clear();

		if self.undo_stack.len() > self.depth {
			self.undo_stack.remove(0);
		}
	}

	/// Pops the last edit and returns the transaction undoing it.
	pub fn undo(&mut self, state: &EditorState) -> Option<Transaction> {
		let step = self.undo_stack.pop()?;
		let Some(tr) = replay(state, &step.undo_steps, step.selection_before) else {
			self.redo_stack.clear();
			return None;
		};
		debug!(steps = step.undo_steps.len(), remaining = self.undo_stack.len(), "undo");
		self.redo_stack.push(step);
		Some(tr)
	}

	/// Pops the last undone edit and returns the transaction redoing it.
	pub fn redo(&mut self, state: &EditorState) -> Option<Transaction> {
		let step = self.redo_stack.pop()?;
		let Some(tr) = replay(state, &step.redo_steps, step.selection_after) else {
			self.redo_stack.clear();
			return None;
		};
		debug!(steps = step.redo_steps.len(), remaining = self.redo_stack.len(), "redo");
		self.undo_stack.push(step);
		Some(tr)
	}
}

fn replay(state: &EditorState, steps: &[Step], selection: Selection) -> Option<Transaction> {
	let mut tr = state.tr();
	for step in steps {
		if let Err(err) = tr.step(step.clone()) {
			warn!(%err, "history step no longer applies");
			return None;
		}
	}
	tr.set_selection(selection).set_add_to_history(false).scroll_into_view();
	Some(tr)
}
