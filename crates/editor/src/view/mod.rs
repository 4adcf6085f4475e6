//! Editor views: a state plus identity, focus and scroll bookkeeping.


use std::cell::Cell;
use std::rc::Rc;

use tagpad_primitives::Pos;
use tracing::trace;

use crate::state::{Applied, EditorState};
use crate::transaction::Transaction;

/// Identifies one view within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// Shared record of which view has focus.
///
/// All views of one session hold clones of the same handle, so focusing one
/// view blurs whichever view had focus before.
#[derive(Debug, Clone, Default)]
pub struct FocusHandle {
	focused: Rc<Cell<Option<ViewId>>>,
	next_id: Rc<Cell<u32>>,
}

impl FocusHandle {
	/// Creates a handle with nothing focused.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates an id for a new view.
	pub fn next_view_id(&self) -> ViewId {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		ViewId(id)
	}

	/// The focused view, if any.
	pub fn focused(&self) -> Option<ViewId> {
		self.focused.get()
	}

	/// Moves focus to `id`.
	pub fn focus(&self, id: ViewId) {
		self.focused.set(Some(id));
	}

	/// Clears focus if `id` has it.
	pub fn blur(&self, id: ViewId) {
		if self.focused.get() == Some(id) {
			self.focused.set(None);
		}
	}
}

/// An editable surface over one [`EditorState`].
#[derive(Debug)]
pub struct EditorView {
	id: ViewId,
	state: EditorState,
	focus: FocusHandle,
	scroll_target: Option<Pos>,
}

impl EditorView {
	/// Creates a view with a fresh id from `focus`.
	pub fn new(state: EditorState, focus: FocusHandle) -> Self {
		Self {
			id: focus.next_view_id(),
			state,
			focus,
			scroll_target: None,
		}
	}

	/// The view's id.
	pub fn id(&self) -> ViewId {
		self.id
	}

	/// The current state.
	pub fn state(&self) -> &EditorState {
		&self.state
	}

	/// Applies `tr` with plugins and adopts the resulting state.
	pub fn dispatch(&mut self, tr: Transaction) -> Applied {
		let applied = self.state.apply_transaction(tr);
		if applied.transactions.iter().any(Transaction::scrolled_into_view) {
			self.scroll_target = Some(applied.state.selection().head());
		}
		trace!(view = self.id.0, transactions = applied.transactions.len(), "dispatch");
		self.state = applied.state.clone();
		applied
	}

	/// Replaces the state without running plugins.
	pub fn update_state(&mut self, state: EditorState) {
		self.state = state;
	}

	/// Gives this view focus.
	pub fn focus(&self) {
		self.focus.focus(self.id);
	}

	/// Returns true if this view has focus.
	pub fn has_focus(&self) -> bool {
		self.focus.focused() == Some(self.id)
	}

	/// Position last scrolled into view.
	pub fn scroll_target(&self) -> Option<Pos> {
		self.scroll_target
	}

	/// Releases focus held by this view.
	pub fn destroy(&mut self) {
		self.focus.blur(self.id);
	}
}
