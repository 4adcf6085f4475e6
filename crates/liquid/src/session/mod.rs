//! An outer editor with node views mounted over it.
//!
//! [`Session`] owns everything one editing surface needs: the outer view and
//! its history, the mounted node views, and the keymaps. It routes input to
//! whichever view claims it and, after every change, syncs node views with
//! the outer document and steps into a node whose editor was just selected.

use tagpad_editor::commands::{self, Command};
use tagpad_editor::{
	EditorConfig, EditorState, EditorView, FocusHandle, History, HistoryAction, InputEvent, InputKind, Keymap,
	KeymapError, Transaction, ViewId,
};
use tagpad_primitives::{Bias, LiquidDelim, Node, NodeKind, Pos, Selection};
use tracing::{debug, info, trace, warn};

use crate::navigation::boundary_keymap;
use crate::outer::OuterEditor;
use crate::registry::{NodeView, NodeViewRegistry, NodeViews};

/// The outer editor as seen by node views.
///
/// Every transaction it applies is recorded in its history and queued until
/// the session syncs node views.
#[derive(Debug)]
pub struct OuterSurface {
	view: EditorView,
	history: History,
	applied: Vec<Transaction>,
	selection_set: bool,
	node_entry: Option<Pos>,
}

impl OuterSurface {
	/// Creates a surface over `state` with a history of `depth` entries.
	pub fn new(state: EditorState, focus: FocusHandle, depth: usize) -> Self {
		Self {
			view: EditorView::new(state, focus),
			history: History::new(depth),
			applied: Vec::new(),
			selection_set: false,
			node_entry: None,
		}
	}

	/// The outer view.
	pub fn view(&self) -> &EditorView {
		&self.view
	}

	/// The outer history.
	pub fn history(&self) -> &History {
		&self.history
	}

	/// Drains the transactions applied since the last call.
	pub fn take_applied(&mut self) -> Vec<Transaction> {
		std::mem::take(&mut self.applied)
	}

	/// Returns whether an applied transaction set the selection explicitly
	/// since the last call, as opposed to only mapping it.
	pub fn take_selection_set(&mut self) -> bool {
		std::mem::take(&mut self.selection_set)
	}

	/// Drains the caret offset requested for a selected node's view by the
	/// last transaction that set the selection.
	pub fn take_node_entry(&mut self) -> Option<Pos> {
		self.node_entry.take()
	}
}

impl OuterEditor for OuterSurface {
	fn state(&self) -> &EditorState {
		self.view.state()
	}

	fn dispatch(&mut self, tr: Transaction) {
		let mut before = self.view.state().clone();
		let applied = self.view.dispatch(tr);
		for tr in &applied.transactions {
			self.history.record_transaction(tr, &before);
			if tr.selection_set() {
				self.selection_set = true;
				self.node_entry = tr.node_entry();
			}
			before = before.apply(tr);
		}
		self.applied.extend(applied.transactions);
	}

	fn focus(&mut self) {
		self.view.focus();
	}

	fn undo(&mut self) -> bool {
		let Some(tr) = self.history.undo(self.view.state()) else {
			return false;
		};
		self.dispatch(tr);
		true
	}

	fn redo(&mut self) -> bool {
		let Some(tr) = self.history.redo(self.view.state()) else {
			return false;
		};
		self.dispatch(tr);
		true
	}
}

/// An outer editor, its node views and input routing.
pub struct Session {
	outer: OuterSurface,
	views: NodeViews,
	registry: NodeViewRegistry,
	focus: FocusHandle,
	config: EditorConfig,
	history_keys: Keymap<HistoryAction>,
	boundary: Keymap<Command>,
	base: Keymap<Command>,
}

impl Session {
	/// Opens `doc` with liquid nodes edited through nested editors.
	pub fn new(doc: Node, config: EditorConfig) -> Result<Self, KeymapError> {
		Self::with_registry(doc, config, NodeViewRegistry::default())
	}

	/// Opens `doc` with the node views in `registry`.
	pub fn with_registry(doc: Node, config: EditorConfig, registry: NodeViewRegistry) -> Result<Self, KeymapError> {
		let history_keys = config.keys.history_keymap()?;
		let focus = FocusHandle::new();
		let state = EditorState::new(doc);
		let outer = OuterSurface::new(state, focus.clone(), config.history.depth);
		outer.view.focus();
		let mut views = NodeViews::new();
		views.materialize(&registry, &outer, &focus, &config);
		info!(views = views.len(), "session opened");
		Ok(Self {
			outer,
			views,
			registry,
			focus,
			config,
			history_keys,
			boundary: boundary_keymap(),
			base: commands::base_keymap(),
		})
	}

	/// The outer state.
	pub fn state(&self) -> &EditorState {
		self.outer.state()
	}

	/// The outer editor.
	pub fn outer(&self) -> &OuterSurface {
		&self.outer
	}

	/// Id of the outer view.
	pub fn outer_view_id(&self) -> ViewId {
		self.outer.view.id()
	}

	/// The view holding focus.
	pub fn focused_view(&self) -> Option<ViewId> {
		self.focus.focused()
	}

	/// Focus shared by the outer view and every node view.
	pub fn focus_handle(&self) -> &FocusHandle {
		&self.focus
	}

	/// The mounted node views.
	pub fn node_views(&self) -> &NodeViews {
		&self.views
	}

	/// The view for the node at `pos`.
	pub fn node_view_at(&self, pos: Pos) -> Option<&dyn NodeView> {
		self.views.get(pos)
	}

	/// The session configuration.
	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	/// Applies an outer transaction.
	pub fn dispatch(&mut self, tr: Transaction) {
		self.outer.dispatch(tr);
		self.flush();
	}

	/// Undoes the last outer edit.
	pub fn undo(&mut self) -> bool {
		let done = self.outer.undo();
		self.flush();
		done
	}

	/// Redoes the last undone outer edit.
	pub fn redo(&mut self) -> bool {
		let done = self.outer.redo();
		self.flush();
		done
	}

	/// Routes `event` to the node view that claims it, or to the outer
	/// editor when it targets the outer view. Returns true if handled.
	pub fn handle_event(&mut self, event: &InputEvent) -> bool {
		let handled = if let Some(view) = self.views.claiming(event) {
			trace!(view = event.target.0, "event routed to node view");
			match &event.kind {
				InputKind::Key(key) => view.handle_key(key, &mut self.outer),
				InputKind::Text(text) => view.handle_text(text, &mut self.outer),
				InputKind::Pointer { pos } => {
					let pos = pos.unwrap_or(0);
					view.set_selection(pos, pos);
					true
				}
			}
		} else if event.target == self.outer.view.id() {
			self.handle_outer(&event.kind)
		} else {
			debug!(view = event.target.0, "event for unknown view");
			false
		};
		self.flush();
		handled
	}

	fn handle_outer(&mut self, kind: &InputKind) -> bool {
		match kind {
			InputKind::Key(key) => {
				if let Some(action) = self.history_keys.get(key).copied() {
					let done = match action {
						HistoryAction::Undo => self.outer.undo(),
						HistoryAction::Redo => self.outer.redo(),
					};
					if done {
						return true;
					}
				}
				let bound = [self.boundary.get(key).copied(), self.base.get(key).copied()];
				let state = self.outer.state().clone();
				let mut out = None;
				let handled = bound
					.into_iter()
					.flatten()
					.any(|command| command(&state, Some(&mut |tr: Transaction| out = Some(tr))));
				if let Some(tr) = out {
					self.outer.dispatch(tr);
				}
				handled
			}
			InputKind::Text(text) => match commands::insert_text(self.outer.state(), text) {
				Ok(tr) => {
					self.outer.dispatch(tr);
					true
				}
				Err(err) => {
					warn!(%err, "text input rejected");
					false
				}
			},
			InputKind::Pointer { pos } => {
				let Some(pos) = *pos else {
					return false;
				};
				let sel = Selection::near(self.outer.state().doc(), pos, Bias::Right);
				let mut tr = self.outer.state().tr();
				tr.set_selection(sel);
				if let Selection::Node { from, .. } = sel
					&& pos > from
				{
					tr.set_node_entry(pos - from - 1);
				}
				self.outer.dispatch(tr);
				self.outer.focus();
				true
			}
		}
	}

	/// Syncs node views, then steps into the node an explicitly set node
	/// selection landed on, at the requested caret offset if there is one.
	fn flush(&mut self) {
		self.views.sync(&self.registry, &mut self.outer, &self.focus, &self.config);
		let entry = self.outer.take_node_entry();
		if self.outer.take_selection_set()
			&& let Selection::Node { from, .. } = self.outer.state().selection()
			&& let Some(view) = self.views.get_mut(from)
		{
			trace!(pos = from, ?entry, "stepping into node view");
			match entry {
				Some(offset) => view.set_selection(offset, offset),
				None => view.select_node(),
			}
		}
	}

	/// Plain-text rendering of the document, one line per block.
	///
	/// Nodes with a view render through it. Liquid nodes without one render
	/// their source between the configured markers.
	pub fn render(&self) -> String {
		let doc = self.outer.state().doc();
		let mut lines = Vec::with_capacity(doc.child_count());
		let mut pos = 0;
		for block in doc.content() {
			let mut line = String::new();
			let mut child_pos = pos + 1;
			for child in block.content() {
				match (child.text_str(), self.views.get(child_pos)) {
					(Some(text), _) => line.push_str(text),
					(None, Some(view)) => line.push_str(&view.render()),
					(None, None) => line.push_str(&self.render_plain(child)),
				}
				child_pos += child.node_size();
			}
			lines.push(line);
			pos += block.node_size();
		}
		lines.join("\n")
	}

	fn render_plain(&self, node: &Node) -> String {
		if node.kind() != NodeKind::Liquid {
			return node.text_content();
		}
		let markers = self.config.liquid.markers(LiquidDelim::from_attrs(node.attrs()));
		format!("{}{}{}", markers.open, node.text_content(), markers.close)
	}

	/// Destroys every node view and the outer view.
	pub fn close(mut self) {
		self.views.destroy_all();
		self.outer.view.destroy();
		info!("session closed");
	}
}
