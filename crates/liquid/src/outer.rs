use std::rc::Rc;

use tagpad_editor::{EditorState, Transaction};
use tagpad_primitives::Pos;

/// Reports a node view's current position in the outer document, or `None`
/// once the node is gone.
pub type GetPos = Rc<dyn Fn() -> Option<Pos>>;

/// The operations a nested editor needs from the editor it is embedded in.
pub trait OuterEditor {
	/// Current outer state.
	fn state(&self) -> &EditorState;

	/// Applies a transaction to the outer document.
	fn dispatch(&mut self, tr: Transaction);

	/// Moves keyboard focus to the outer editor.
	fn focus(&mut self);

	/// Undoes the last outer edit. Returns false if there was nothing to undo.
	fn undo(&mut self) -> bool;

	/// Redoes the last undone outer edit. Returns false if there was nothing
	/// to redo.
	fn redo(&mut self) -> bool;
}
