//! Arrow-key bindings for the outer editor that step into liquid nodes.
//!
//! Default motion jumps over atomic nodes. These commands run first: when a
//! collapsed caret sits next to an atomic inline node in the direction of
//! travel, the selection is placed near the position one step further on,
//! which lands inside the node and so selects it as a node. The transaction
//! also records where in the node's content that position falls, so the
//! session hands the node's editor a caret on the side it was entered from.

#[cfg(test)]
mod tests;

use tagpad_editor::EditorState;
use tagpad_editor::Keymap;
use tagpad_editor::commands::{Command, Dispatch};
use tagpad_primitives::{Bias, Key, KeyCode, Selection};
use tracing::trace;

fn arrow(state: &EditorState, dispatch: Dispatch<'_>, side: i8) -> bool {
	let Some(head) = state.selection().caret_pos() else {
		return false;
	};
	let Ok(rp) = state.doc().resolve(head) else {
		return false;
	};
	let adjacent = if side > 0 { rp.node_after() } else { rp.node_before() };
	if !adjacent.is_some_and(|node| node.spec().is_atomic_inline()) {
		return false;
	}
	let target = if side > 0 { head + 1 } else { head - 1 };
	let sel = Selection::near(state.doc(), target, Bias::from_side(side));
	trace!(head, target, ?sel, "stepping into adjacent atom");
	if let Some(dispatch) = dispatch {
		let mut tr = state.tr();
		tr.set_selection(sel).scroll_into_view();
		// The node's editor takes the caret on the side it was entered from.
		if let Selection::Node { from, .. } = sel {
			tr.set_node_entry(target.saturating_sub(from + 1));
		}
		dispatch(tr);
	}
	true
}

/// Steps left into an atomic inline node before the caret.
pub fn arrow_left(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	arrow(state, dispatch, -1)
}

/// Steps right into an atomic inline node after the caret.
pub fn arrow_right(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	arrow(state, dispatch, 1)
}

/// Steps up into an atomic inline node before the caret.
pub fn arrow_up(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	arrow(state, dispatch, -1)
}

/// Steps down into an atomic inline node after the caret.
pub fn arrow_down(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	arrow(state, dispatch, 1)
}

/// Bindings for the four arrow keys.
pub fn boundary_keymap() -> Keymap<Command> {
	let mut keymap: Keymap<Command> = Keymap::new();
	keymap
		.bind_key(Key::new(KeyCode::Left), arrow_left)
		.bind_key(Key::new(KeyCode::Right), arrow_right)
		.bind_key(Key::new(KeyCode::Up), arrow_up)
		.bind_key(Key::new(KeyCode::Down), arrow_down);
	keymap
}
