//! The nested editor behind one liquid node.
//!
//! The controller owns an inner [`EditorView`] whose document root is a copy
//! of the liquid node, so inner position `p` is outer position
//! `node_pos + 1 + p`. Edits flow both ways:
//!
//! * Inner edits are shifted by that offset and dispatched to the outer
//!   editor ([`LiquidController::dispatch_inner`]).
//! * Outer edits that touch the node arrive through [`NodeView::update`] and
//!   are replayed into the inner document as the smallest differing range,
//!   tagged [`TxFlags::FROM_OUTSIDE`] so they are not sent back out.
//!
//! History lives only in the outer editor: undo and redo pressed inside the
//! nested editor act on the outer history.
//!
//! [`TxFlags::FROM_OUTSIDE`]: tagpad_editor::TxFlags::FROM_OUTSIDE

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tagpad_editor::commands::{self, Command};
use tagpad_editor::config::Markers;
use tagpad_editor::{
	EditorConfig, EditorState, EditorView, FocusHandle, HistoryAction, InputEvent, Keymap, KeymapError, Plugin,
	SingleLine, Transaction, ViewId,
};
use tagpad_primitives::{DiffEnd, Fragment, Key, KeyCode, LiquidDelim, Node, Pos, Selection, StepMap};
use tracing::{debug, trace, warn};

use crate::outer::{GetPos, OuterEditor};
use crate::registry::{NodeView, NodeViewContext};

/// Actions bound inside a nested editor ahead of the base keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InnerAction {
	History(HistoryAction),
	Escape(i8),
	Remove,
}

fn inner_keymap(config: &EditorConfig) -> Result<Keymap<InnerAction>, KeymapError> {
	let mut keymap = Keymap::new();
	keymap
		.bind_all(&config.keys.undo, InnerAction::History(HistoryAction::Undo))?
		.bind_all(&config.keys.redo, InnerAction::History(HistoryAction::Redo))?;
	keymap
		.bind_key(Key::new(KeyCode::Left), InnerAction::Escape(-1))
		.bind_key(Key::new(KeyCode::Right), InnerAction::Escape(1))
		.bind_key(Key::new(KeyCode::Backspace), InnerAction::Remove)
		.bind_key(Key::new(KeyCode::Delete), InnerAction::Remove);
	Ok(keymap)
}

/// Range over which an outer node's content and the inner document differ.
///
/// `start..end_new` in the new content replaces `start..end_old` in the inner
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRange {
	/// First differing position.
	pub start: Pos,
	/// End of the differing range in the new content.
	pub end_new: Pos,
	/// End of the differing range in the inner document.
	pub end_old: Pos,
}

/// Computes the minimal replacement turning `old` into `new`, or `None` if the
/// two are identical.
///
/// Repeated content lets the forward and backward scans cross (`"aa"` to
/// `"aaa"` differs from 2 going forward but only up to 1 going backward).
/// Both ends are then pushed right by the overlap so that neither precedes
/// `start`.
pub fn sync_range(new: &Fragment, old: &Fragment) -> Option<SyncRange> {
	let start = new.find_diff_start(old)?;
	let DiffEnd {
		a: mut end_new,
		b: mut end_old,
	} = new.find_diff_end(old)?;
	let overlap = start.saturating_sub(end_new.min(end_old));
	if overlap > 0 {
		end_new += overlap;
		end_old += overlap;
	}
	Some(SyncRange { start, end_new, end_old })
}

/// Nested editor for a liquid node.
pub struct LiquidController {
	node: Node,
	get_pos: GetPos,
	view: EditorView,
	keymap: Keymap<InnerAction>,
	base: Keymap<Command>,
	markers: Markers,
}

impl LiquidController {
	/// Creates the nested editor for `node`, whose outer position is reported
	/// by `get_pos`.
	///
	/// Fails only if the configured history bindings do not parse.
	pub fn new(node: Node, get_pos: GetPos, focus: FocusHandle, config: &EditorConfig) -> Result<Self, KeymapError> {
		let mut plugins: Vec<Arc<dyn Plugin>> = Vec::new();
		if config.liquid.single_line {
			plugins.push(Arc::new(SingleLine));
		}
		let state = EditorState::with_plugins(node.clone(), plugins);
		let view = EditorView::new(state, focus);
		let markers = config.liquid.markers(LiquidDelim::from_attrs(node.attrs())).clone();
		debug!(view = view.id().0, size = node.content_size(), "liquid editor created");
		Ok(Self {
			node,
			get_pos,
			view,
			keymap: inner_keymap(config)?,
			base: commands::base_keymap(),
			markers,
		})
	}

	/// Factory registered for [`NodeKind::Liquid`](tagpad_primitives::NodeKind::Liquid).
	pub fn create(cx: NodeViewContext<'_>) -> Result<Box<dyn NodeView>, KeymapError> {
		let controller = Self::new(cx.node.clone(), cx.get_pos, cx.focus.clone(), cx.config)?;
		Ok(Box::new(controller))
	}

	/// The inner editor view.
	pub fn inner(&self) -> &EditorView {
		&self.view
	}

	/// Length of the node's content.
	pub fn inner_length(&self) -> usize {
		self.node.node_size() - 2
	}

	/// Applies `tr` to the inner editor and mirrors its document changes,
	/// including those plugins append to it, into the outer document.
	///
	/// A transaction tagged as coming from outside is applied locally only.
	/// Nothing is sent out once the node has left the outer document.
	pub fn dispatch_inner(&mut self, tr: Transaction, outer: &mut dyn OuterEditor) {
		let from_outside = tr.is_from_outside();
		let applied = self.view.dispatch(tr);
		if from_outside {
			return;
		}
		let outgoing: Vec<&Transaction> = applied.transactions.iter().filter(|tr| tr.doc_changed()).collect();
		if outgoing.is_empty() {
			return;
		}
		let Some(pos) = (self.get_pos)() else {
			debug!(view = self.view.id().0, "liquid node detached, edit kept local");
			return;
		};
		let offset = StepMap::offset(pos + 1);
		let mut outer_tr = outer.state().tr();
		for step in outgoing.iter().flat_map(|tr| tr.steps()) {
			let Some(mapped) = step.map(&offset) else {
				continue;
			};
			if let Err(err) = outer_tr.step(mapped) {
				warn!(%err, pos, "inner step does not apply to the outer document");
				return;
			}
		}
		if !outer_tr.doc_changed() {
			return;
		}
		trace!(pos, steps = outer_tr.steps().len(), "propagating inner edit");
		outer.dispatch(outer_tr);
	}

	/// Moves the outer caret past the node when the inner caret sits at the
	/// content edge facing `dir`, and hands focus back to the outer editor.
	pub fn maybe_escape(&mut self, dir: i8, outer: &mut dyn OuterEditor) -> bool {
		let sel = self.view.state().selection();
		let Some(head) = sel.caret_pos() else {
			return false;
		};
		let edge = if dir < 0 { 0 } else { self.inner_length() };
		if head != edge {
			return false;
		}
		let Some(pos) = (self.get_pos)() else {
			return false;
		};
		let target = if dir < 0 { pos } else { pos + self.node.node_size() };
		let mut tr = outer.state().tr();
		tr.set_selection(Selection::caret(target)).scroll_into_view();
		trace!(pos, target, "escaping liquid editor");
		outer.dispatch(tr);
		outer.focus();
		true
	}

	/// Deletes the node from the outer document when its content is empty.
	pub fn maybe_remove(&mut self, outer: &mut dyn OuterEditor) -> bool {
		if self.inner_length() > 0 {
			return false;
		}
		let Some(pos) = (self.get_pos)() else {
			return false;
		};
		let mut tr = outer.state().tr();
		let sel = match Selection::node(tr.doc(), pos) {
			Ok(sel) => sel,
			Err(err) => {
				warn!(%err, pos, "empty liquid node not found");
				return false;
			}
		};
		if let Err(err) = tr.set_selection(sel).delete_selection() {
			warn!(%err, pos, "could not remove empty liquid node");
			return false;
		}
		debug!(pos, "removing empty liquid node");
		outer.dispatch(tr);
		outer.focus();
		true
	}

	fn run_base(&mut self, key: &Key, outer: &mut dyn OuterEditor) -> bool {
		let Some(command) = self.base.get(key).copied() else {
			return false;
		};
		let mut out = None;
		let handled = command(self.view.state(), Some(&mut |tr: Transaction| out = Some(tr)));
		if let Some(tr) = out {
			self.dispatch_inner(tr, outer);
		}
		handled
	}
}

impl NodeView for LiquidController {
	fn view_id(&self) -> ViewId {
		self.view.id()
	}

	fn node(&self) -> &Node {
		&self.node
	}

	fn inner_state(&self) -> Option<&EditorState> {
		Some(self.view.state())
	}

	fn update(&mut self, node: &Node, outer: &mut dyn OuterEditor) -> bool {
		if !node.same_markup(&self.node) {
			return false;
		}
		self.node = node.clone();
		let state = self.view.state();
		let Some(range) = sync_range(node.content(), state.doc().content()) else {
			return true;
		};
		let slice = match node.slice(range.start, range.end_new) {
			Ok(slice) => slice,
			Err(err) => {
				warn!(%err, ?range, "outer change does not slice");
				return true;
			}
		};
		let mut tr = state.tr();
		if let Err(err) = tr.replace(range.start, range.end_old, slice) {
			warn!(%err, ?range, "outer change does not apply to the inner document");
			return true;
		}
		tr.set_from_outside();
		trace!(?range, "syncing outer change inward");
		self.dispatch_inner(tr, outer);
		true
	}

	fn select_node(&mut self) {
		let mut tr = self.view.state().tr();
		tr.set_selection(Selection::caret(0));
		self.view.dispatch(tr);
		self.view.focus();
	}

	fn set_selection(&mut self, anchor: Pos, head: Pos) {
		let len = self.inner_length();
		let mut tr = self.view.state().tr();
		tr.set_selection(Selection::text(anchor.min(len), head.min(len)));
		self.view.dispatch(tr);
		self.view.focus();
	}

	fn stop_event(&self, event: &InputEvent) -> bool {
		event.target == self.view.id()
	}

	fn ignore_mutation(&self) -> bool {
		true
	}

	fn handle_key(&mut self, key: &Key, outer: &mut dyn OuterEditor) -> bool {
		let handled = match self.keymap.get(key).copied() {
			Some(InnerAction::History(HistoryAction::Undo)) => outer.undo(),
			Some(InnerAction::History(HistoryAction::Redo)) => outer.redo(),
			Some(InnerAction::Escape(dir)) => self.maybe_escape(dir, outer),
			Some(InnerAction::Remove) => self.maybe_remove(outer),
			None => false,
		};
		handled || self.run_base(key, outer)
	}

	fn handle_text(&mut self, text: &str, outer: &mut dyn OuterEditor) -> bool {
		match commands::insert_text(self.view.state(), text) {
			Ok(tr) => {
				self.dispatch_inner(tr, outer);
				true
			}
			Err(err) => {
				warn!(%err, "text input rejected");
				false
			}
		}
	}

	fn render(&self) -> String {
		format!(
			"{}{}{}",
			self.markers.open,
			self.view.state().doc().text_content(),
			self.markers.close
		)
	}

	fn destroy(&mut self) {
		debug!(view = self.view.id().0, "liquid editor destroyed");
		self.view.destroy();
	}
}
