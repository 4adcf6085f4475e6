//! Node views and the set of views mounted over an outer document.
//!
//! A [`NodeViewRegistry`] maps node kinds to factories. [`NodeViews`] keeps
//! one live view per registered node, tracks each view's position as the
//! outer document changes, and decides after every change whether a view is
//! updated in place, rebuilt, or destroyed.


use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::FxHashMap as HashMap;
use tagpad_editor::{EditorConfig, EditorState, FocusHandle, InputEvent, KeymapError, Transaction, ViewId};
use tagpad_primitives::{Bias, Key, Mappable, Node, NodeKind, Pos};
use tracing::{debug, trace, warn};

use crate::controller::LiquidController;
use crate::outer::GetPos;
use crate::outer::OuterEditor;
use crate::session::OuterSurface;

/// Rounds of view updates allowed to feed edits back into the outer document
/// before syncing gives up.
const MAX_SYNC_ROUNDS: usize = 8;

/// A view managing one node of the outer document.
pub trait NodeView {
	/// Id of the view receiving this node's input.
	fn view_id(&self) -> ViewId;

	/// The node as last seen by this view.
	fn node(&self) -> &Node;

	/// State of the view's own editor, if it has one.
	fn inner_state(&self) -> Option<&EditorState> {
		None
	}

	/// Brings the view up to date with `node`. Returns false if the view
	/// cannot represent it and must be rebuilt.
	fn update(&mut self, node: &Node, outer: &mut dyn OuterEditor) -> bool;

	/// Called when the outer selection lands on this node as a node selection.
	fn select_node(&mut self);

	/// Sets the selection inside the view and focuses it.
	fn set_selection(&mut self, anchor: Pos, head: Pos);

	/// Returns true if the view handles `event` itself.
	fn stop_event(&self, event: &InputEvent) -> bool;

	/// Returns true if changes to the view's rendered output are its own
	/// business and must not be read back as outer edits.
	fn ignore_mutation(&self) -> bool;

	/// Handles a key press routed to this view.
	fn handle_key(&mut self, key: &Key, outer: &mut dyn OuterEditor) -> bool;

	/// Handles text input routed to this view.
	fn handle_text(&mut self, text: &str, outer: &mut dyn OuterEditor) -> bool;

	/// Plain-text rendering of the node.
	fn render(&self) -> String;

	/// Releases the view's resources.
	fn destroy(&mut self);
}

/// Inputs for building a node view.
pub struct NodeViewContext<'a> {
	/// The node to manage.
	pub node: &'a Node,
	/// Live position of the node in the outer document.
	pub get_pos: GetPos,
	/// Focus shared with the outer editor.
	pub focus: &'a FocusHandle,
	/// Session configuration.
	pub config: &'a EditorConfig,
}

/// Builds a node view.
pub type NodeViewFactory = fn(NodeViewContext<'_>) -> Result<Box<dyn NodeView>, KeymapError>;

/// Node view factories by node kind.
#[derive(Clone)]
pub struct NodeViewRegistry {
	factories: HashMap<NodeKind, NodeViewFactory>,
}

impl Default for NodeViewRegistry {
	/// A registry with the liquid editor registered.
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(NodeKind::Liquid, LiquidController::create);
		registry
	}
}

impl NodeViewRegistry {
	/// A registry with no factories.
	pub fn empty() -> Self {
		Self {
			factories: HashMap::default(),
		}
	}

	/// Registers `factory` for `kind`, replacing any earlier one.
	pub fn register(&mut self, kind: NodeKind, factory: NodeViewFactory) -> &mut Self {
		self.factories.insert(kind, factory);
		self
	}

	/// The factory for `kind`.
	pub fn get(&self, kind: NodeKind) -> Option<NodeViewFactory> {
		self.factories.get(&kind).copied()
	}

	/// Returns true if nodes of `kind` get a view.
	pub fn contains(&self, kind: NodeKind) -> bool {
		self.factories.contains_key(&kind)
	}
}

struct Mounted {
	pos: Rc<Cell<Option<Pos>>>,
	view: Box<dyn NodeView>,
}

/// The node views mounted over one outer document, in document order.
#[derive(Default)]
pub struct NodeViews {
	mounted: Vec<Mounted>,
}

impl NodeViews {
	/// An empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of mounted views.
	pub fn len(&self) -> usize {
		self.mounted.len()
	}

	/// Returns true if no view is mounted.
	pub fn is_empty(&self) -> bool {
		self.mounted.is_empty()
	}

	/// Positions of the mounted views.
	pub fn positions(&self) -> Vec<Pos> {
		self.mounted.iter().filter_map(|m| m.pos.get()).collect()
	}

	/// The view for the node at `pos`.
	pub fn get(&self, pos: Pos) -> Option<&dyn NodeView> {
		self.mounted
			.iter()
			.find(|m| m.pos.get() == Some(pos))
			.map(|m| m.view.as_ref())
	}

	/// The view for the node at `pos`, mutably.
	pub fn get_mut(&mut self, pos: Pos) -> Option<&mut (dyn NodeView + 'static)> {
		self.mounted
			.iter_mut()
			.find(|m| m.pos.get() == Some(pos))
			.map(|m| m.view.as_mut())
	}

	/// The first view that claims `event`.
	pub fn claiming(&mut self, event: &InputEvent) -> Option<&mut (dyn NodeView + 'static)> {
		self.mounted
			.iter_mut()
			.find(|m| m.view.stop_event(event))
			.map(|m| m.view.as_mut())
	}

	/// The view with id `id`.
	pub fn by_id(&self, id: ViewId) -> Option<&dyn NodeView> {
		self.mounted.iter().find(|m| m.view.view_id() == id).map(|m| m.view.as_ref())
	}

	/// Mounts a view for every registered node in the outer document that
	/// lacks one.
	pub fn materialize(
		&mut self,
		registry: &NodeViewRegistry,
		outer: &OuterSurface,
		focus: &FocusHandle,
		config: &EditorConfig,
	) {
		let doc = outer.state().doc().clone();
		let mut found = Vec::new();
		doc.descendants(|node, pos| {
			if registry.contains(node.kind()) {
				found.push((pos, node.clone()));
			}
			!node.is_atom()
		});
		for (pos, node) in found {
			if self.mounted.iter().any(|m| m.pos.get() == Some(pos)) {
				continue;
			}
			let Some(factory) = registry.get(node.kind()) else {
				continue;
			};
			let cell = Rc::new(Cell::new(Some(pos)));
			let tracked = Rc::clone(&cell);
			let cx = NodeViewContext {
				node: &node,
				get_pos: Rc::new(move || tracked.get()),
				focus,
				config,
			};
			match factory(cx) {
				Ok(view) => {
					trace!(pos, kind = node.kind().name(), "mounted node view");
					self.mounted.push(Mounted { pos: cell, view });
				}
				Err(err) => warn!(%err, pos, kind = node.kind().name(), "node view factory failed"),
			}
		}
		self.mounted.sort_by_key(|m| m.pos.get());
	}

	/// Brings every view up to date with the transactions the outer editor
	/// applied since the last sync.
	///
	/// Each view's position is mapped through the changes. A view whose node
	/// was deleted, or whose [`NodeView::update`] refuses the new node, is
	/// destroyed and rebuilt when a registered node still sits at its
	/// position. Views may dispatch outer edits while updating; those are
	/// mapped and synced in further rounds.
	pub fn sync(
		&mut self,
		registry: &NodeViewRegistry,
		outer: &mut OuterSurface,
		focus: &FocusHandle,
		config: &EditorConfig,
	) {
		let pending = outer.take_applied();
		if pending.is_empty() {
			return;
		}
		self.remap(&pending);
		let mut settled = false;
		for _ in 0..MAX_SYNC_ROUNDS {
			if !self.refresh(outer) {
				settled = true;
				break;
			}
		}
		if !settled {
			warn!(rounds = MAX_SYNC_ROUNDS, "node views did not settle");
		}
		self.materialize(registry, outer, focus, config);
	}

	/// Maps positions through `transactions`, clearing those of deleted nodes.
	fn remap(&mut self, transactions: &[Transaction]) {
		for mounted in &self.mounted {
			let Some(mut pos) = mounted.pos.get() else {
				continue;
			};
			let mut alive = true;
			for tr in transactions {
				let result = tr.mapping().map_result(pos, Bias::Right);
				if result.deleted_after() {
					alive = false;
					break;
				}
				pos = result.pos;
			}
			mounted.pos.set(alive.then_some(pos));
		}
	}

	/// Updates every view from the current outer document. Returns true if
	/// an update changed the outer document.
	fn refresh(&mut self, outer: &mut OuterSurface) -> bool {
		let mut changed = false;
		let mut index = 0;
		while index < self.mounted.len() {
			let mounted = &mut self.mounted[index];
			let node = mounted.pos.get().and_then(|pos| outer.state().doc().node_at(pos));
			let kept = match node {
				Some(node) if node.kind() == mounted.view.node().kind() => mounted.view.update(&node, outer),
				_ => false,
			};
			if !kept {
				let mut gone = self.mounted.remove(index);
				debug!(pos = ?gone.pos.get(), "dropping node view");
				gone.pos.set(None);
				gone.view.destroy();
				continue;
			}
			let fed_back = outer.take_applied();
			if !fed_back.is_empty() {
				self.remap(&fed_back);
				changed = true;
			}
			index += 1;
		}
		changed
	}

	/// Destroys every view.
	pub fn destroy_all(&mut self) {
		for mut mounted in self.mounted.drain(..) {
			mounted.pos.set(None);
			mounted.view.destroy();
		}
	}
}
