//! Base editing commands.
//!
//! A command inspects a state and, when it applies, builds a transaction and
//! hands it to `dispatch`. Called without a dispatcher it only reports
//! whether it would apply. The boolean result means "handled": `false` lets
//! the next binding or handler try.

#[cfg(test)]
mod tests;

use tagpad_primitives::graphemes::{next_grapheme_boundary, prev_grapheme_boundary};
use tagpad_primitives::{Bias, Fragment, Key, KeyCode, Node, Pos, ResolvedPos, Selection, Slice, StepError};
use tracing::warn;

use crate::keymap::Keymap;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// Receives the transaction a command built.
pub type Dispatch<'a> = Option<&'a mut dyn FnMut(Transaction)>;

/// A command over editor state.
pub type Command = fn(&EditorState, Dispatch<'_>) -> bool;

fn run(dispatch: Dispatch<'_>, build: impl FnOnce() -> Result<Option<Transaction>, StepError>) -> bool {
	match build() {
		Ok(Some(tr)) => {
			if let Some(dispatch) = dispatch {
				dispatch(tr);
			}
			true
		}
		Ok(None) => false,
		Err(err) => {
			warn!(%err, "command step failed");
			false
		}
	}
}

fn caret(state: &EditorState) -> Option<ResolvedPos> {
	let head = state.selection().caret_pos()?;
	state.doc().resolve(head).ok()
}

/// Deletes the selection, or the grapheme or node before the caret, or joins
/// the caret's block with the one before it.
pub fn delete_backward(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	run(dispatch, || {
		let mut tr = state.tr();
		if !state.selection().is_empty() {
			tr.delete_selection()?.scroll_into_view();
			return Ok(Some(tr));
		}
		let Some(rp) = caret(state) else {
			return Ok(None);
		};
		let head = rp.pos();
		match rp.node_before() {
			Some(before) => {
				let from = match before.text_str() {
					Some(text) => head - (before.node_size() - prev_grapheme_boundary(text, before.node_size())),
					None => head - before.node_size(),
				};
				tr.delete(from, head)?;
			}
			None => {
				let depth = rp.depth();
				let Some(block_start) = rp.before(depth) else {
					return Ok(None);
				};
				if depth == 0 || rp.index(depth - 1) == 0 {
					return Ok(None);
				}
				tr.delete(block_start - 1, head)?;
			}
		}
		tr.scroll_into_view();
		Ok(Some(tr))
	})
}

/// Deletes the selection, or the grapheme or node after the caret, or joins
/// the block after the caret's block into it.
pub fn delete_forward(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	run(dispatch, || {
		let mut tr = state.tr();
		if !state.selection().is_empty() {
			tr.delete_selection()?.scroll_into_view();
			return Ok(Some(tr));
		}
		let Some(rp) = caret(state) else {
			return Ok(None);
		};
		let head = rp.pos();
		match rp.node_after() {
			Some(after) => {
				let to = match after.text_str() {
					Some(text) => head + next_grapheme_boundary(text, 0),
					None => head + after.node_size(),
				};
				tr.delete(head, to)?;
			}
			None => {
				let depth = rp.depth();
				let Some(block_end) = rp.after(depth) else {
					return Ok(None);
				};
				let container = rp.node(depth - 1);
				if rp.index(depth - 1) + 1 >= container.child_count() {
					return Ok(None);
				}
				tr.delete(head, block_end + 1)?;
			}
		}
		tr.scroll_into_view();
		Ok(Some(tr))
	})
}

/// Target of a one-unit horizontal caret move, or `None` at a document edge.
///
/// Text moves by grapheme. Atomic nodes are jumped over as a whole. At a
/// block edge the caret moves into the neighbouring block.
fn horizontal_target(rp: &ResolvedPos, dir: i8) -> Option<Pos> {
	let head = rp.pos();
	let adjacent = if dir < 0 { rp.node_before() } else { rp.node_after() };
	if let Some(node) = adjacent {
		let size = node.node_size();
		return Some(match (node.text_str(), dir < 0) {
			(Some(text), true) => head - (size - prev_grapheme_boundary(text, size)),
			(Some(text), false) => head + next_grapheme_boundary(text, 0),
			(None, true) => head - size,
			(None, false) => head + size,
		});
	}
	let depth = rp.depth();
	let bound = if dir < 0 { rp.before(depth)? } else { rp.after(depth)? };
	let doc = rp.doc();
	let sel = Selection::near(doc, bound, Bias::from_side(dir));
	let target = sel.caret_pos()?;
	(target != head).then_some(target)
}

fn move_horizontal(state: &EditorState, dispatch: Dispatch<'_>, dir: i8) -> bool {
	run(dispatch, || {
		let sel = state.selection();
		let mut tr = state.tr();
		if !sel.is_empty() {
			let pos = if dir < 0 { sel.from() } else { sel.to() };
			tr.set_selection(Selection::near(state.doc(), pos, Bias::from_side(dir)))
				.scroll_into_view();
			return Ok(Some(tr));
		}
		let Some(rp) = caret(state) else {
			return Ok(None);
		};
		let Some(target) = horizontal_target(&rp, dir) else {
			return Ok(None);
		};
		tr.set_selection(Selection::caret(target)).scroll_into_view();
		Ok(Some(tr))
	})
}

/// Moves the caret one unit left, collapsing a selection to its start.
pub fn move_left(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	move_horizontal(state, dispatch, -1)
}

/// Moves the caret one unit right, collapsing a selection to its end.
pub fn move_right(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	move_horizontal(state, dispatch, 1)
}

fn move_vertical(state: &EditorState, dispatch: Dispatch<'_>, dir: i8) -> bool {
	run(dispatch, || {
		let head = state.selection().head();
		let Ok(rp) = state.doc().resolve(head) else {
			return Ok(None);
		};
		let depth = rp.depth();
		if depth == 0 {
			return Ok(None);
		}
		let container = rp.node(depth - 1);
		let index = rp.index(depth - 1);
		let target_index = if dir < 0 {
			index.checked_sub(1)
		} else {
			Some(index + 1).filter(|i| *i < container.child_count())
		};
		let Some(target_index) = target_index else {
			return Ok(None);
		};
		// Content start of the target block.
		let mut start = rp.start(depth - 1);
		for i in 0..target_index {
			start += container.child(i).node_size();
		}
		let target_block = container.child(target_index);
		let pos = start + 1 + rp.parent_offset().min(target_block.content_size());
		let sel = Selection::near(state.doc(), pos, Bias::from_side(dir));
		let mut tr = state.tr();
		tr.set_selection(sel).scroll_into_view();
		Ok(Some(tr))
	})
}

/// Moves the caret to the same offset in the previous block.
pub fn move_up(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	move_vertical(state, dispatch, -1)
}

/// Moves the caret to the same offset in the next block.
pub fn move_down(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	move_vertical(state, dispatch, 1)
}

/// Splits the caret's textblock in two, deleting any selection first.
pub fn split_block(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	run(dispatch, || {
		let mut tr = state.tr();
		tr.delete_selection()?;
		let Some(pos) = tr.selection().caret_pos() else {
			return Ok(None);
		};
		let Ok(rp) = tr.doc().resolve(pos) else {
			return Ok(None);
		};
		if !rp.parent().is_textblock() {
			return Ok(None);
		}
		let halves = Fragment::from_nodes([Node::paragraph([]), Node::paragraph([])]);
		tr.replace(pos, pos, Slice::new(halves, 1, 1))?;
		tr.set_selection(Selection::caret(pos + 2)).scroll_into_view();
		Ok(Some(tr))
	})
}

/// Selects the whole document.
pub fn select_all(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
	run(dispatch, || {
		let mut tr = state.tr();
		tr.set_selection(Selection::all(state.doc()));
		Ok(Some(tr))
	})
}

/// Builds a transaction replacing the selection with `text`.
pub fn insert_text(state: &EditorState, text: &str) -> Result<Transaction, StepError> {
	let mut tr = state.tr();
	tr.replace_selection_with_text(text)?.scroll_into_view();
	Ok(tr)
}

/// Runs commands in order until one handles the state.
pub fn chain(commands: &[Command], state: &EditorState, mut dispatch: Dispatch<'_>) -> bool {
	for command in commands {
		let handled = match dispatch.as_mut() {
			Some(dispatch) => {
				let dispatch: &mut dyn FnMut(Transaction) = &mut **dispatch;
				command(state, Some(dispatch))
			}
			None => command(state, None),
		};
		if handled {
			return true;
		}
	}
	false
}

/// Default bindings for caret motion, deletion, block splitting and select-all.
pub fn base_keymap() -> Keymap<Command> {
	let mut keymap: Keymap<Command> = Keymap::new();
	keymap
		.bind_key(Key::new(KeyCode::Left), move_left)
		.bind_key(Key::new(KeyCode::Right), move_right)
		.bind_key(Key::new(KeyCode::Up), move_up)
		.bind_key(Key::new(KeyCode::Down), move_down)
		.bind_key(Key::new(KeyCode::Backspace), delete_backward)
		.bind_key(Key::new(KeyCode::Delete), delete_forward)
		.bind_key(Key::new(KeyCode::Enter), split_block)
		.bind_key(Key::ctrl('a'), select_all);
	keymap
}
