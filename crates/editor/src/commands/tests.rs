use pretty_assertions::assert_eq;
use tagpad_primitives::LiquidDelim;

use super::*;

fn p(text: &str) -> Node {
	Node::paragraph([Node::text(text)])
}

fn liquid(text: &str) -> Node {
	Node::liquid(LiquidDelim::Tag, text)
}

fn at(doc: Node, sel: Selection) -> EditorState {
	let state = EditorState::new(doc);
	let mut tr = state.tr();
	tr.set_selection(sel);
	state.apply(&tr)
}

/// Runs `command` and returns the resulting state, or `None` if it declined.
fn exec(command: Command, state: &EditorState) -> Option<EditorState> {
	let mut out = None;
	let handled = command(state, Some(&mut |tr: Transaction| out = Some(state.apply(&tr))));
	assert_eq!(handled, out.is_some());
	out
}

/// `0 <p> 1 a 2 b 3 <liquid> 4 x 5 </liquid> 6 c 7 </p> 8`
fn sample() -> Node {
	Node::doc([Node::paragraph([Node::text("ab"), liquid("x"), Node::text("c")])])
}

#[test]
fn delete_backward_removes_grapheme() {
	let state = at(Node::doc([p("ae\u{301}")]), Selection::caret(4));
	let next = exec(delete_backward, &state).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("a")]));
	assert_eq!(next.selection(), Selection::caret(2));
}

#[test]
fn delete_backward_removes_whole_atom() {
	let next = exec(delete_backward, &at(sample(), Selection::caret(6))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("abc")]));
	assert_eq!(next.selection(), Selection::caret(3));
}

#[test]
fn delete_backward_joins_blocks() {
	// 0 <p> 1 a 2 </p> 3 <p> 4 b 5 </p> 6
	let next = exec(delete_backward, &at(Node::doc([p("a"), p("b")]), Selection::caret(4))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("ab")]));
	assert_eq!(next.selection(), Selection::caret(2));
}

#[test]
fn delete_backward_at_start_declines() {
	assert!(exec(delete_backward, &at(sample(), Selection::caret(1))).is_none());
	assert!(!delete_backward(&at(sample(), Selection::caret(1)), None));
}

#[test]
fn delete_forward_removes_atom_and_joins() {
	let next = exec(delete_forward, &at(sample(), Selection::caret(3))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("abc")]));

	let next = exec(delete_forward, &at(Node::doc([p("a"), p("b")]), Selection::caret(2))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("ab")]));
	assert!(exec(delete_forward, &at(Node::doc([p("a")]), Selection::caret(2))).is_none());
}

#[test]
fn delete_with_selection_deletes_it() {
	let next = exec(delete_forward, &at(sample(), Selection::text(2, 7))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("a")]));
}

#[test]
fn horizontal_motion_jumps_over_atoms() {
	let right = exec(move_right, &at(sample(), Selection::caret(3))).unwrap();
	assert_eq!(right.selection(), Selection::caret(6));
	let left = exec(move_left, &at(sample(), Selection::caret(6))).unwrap();
	assert_eq!(left.selection(), Selection::caret(3));
}

#[test]
fn horizontal_motion_crosses_blocks() {
	let doc = Node::doc([p("a"), p("b")]);
	let right = exec(move_right, &at(doc.clone(), Selection::caret(2))).unwrap();
	assert_eq!(right.selection(), Selection::caret(4));
	let left = exec(move_left, &at(doc.clone(), Selection::caret(4))).unwrap();
	assert_eq!(left.selection(), Selection::caret(2));
	assert!(exec(move_left, &at(doc.clone(), Selection::caret(1))).is_none());
	assert!(exec(move_right, &at(doc, Selection::caret(5))).is_none());
}

#[test]
fn horizontal_motion_collapses_selection() {
	let left = exec(move_left, &at(sample(), Selection::text(2, 7))).unwrap();
	assert_eq!(left.selection(), Selection::caret(2));
	let right = exec(move_right, &at(sample(), Selection::Node { from: 3, to: 6 })).unwrap();
	assert_eq!(right.selection(), Selection::caret(6));
}

#[test]
fn vertical_motion_keeps_offset() {
	// 0 <p> 1 a 2 b 3 </p> 4 <p> 5 c 6 d 7 e 8 </p> 9
	let doc = Node::doc([p("ab"), p("cde")]);
	let down = exec(move_down, &at(doc.clone(), Selection::caret(3))).unwrap();
	assert_eq!(down.selection(), Selection::caret(7));
	let up = exec(move_up, &at(doc.clone(), Selection::caret(8))).unwrap();
	assert_eq!(up.selection(), Selection::caret(3));
	assert!(exec(move_up, &at(doc, Selection::caret(2))).is_none());
}

#[test]
fn split_block_splits_paragraph() {
	let next = exec(split_block, &at(Node::doc([p("ab")]), Selection::caret(2))).unwrap();
	assert_eq!(next.doc(), &Node::doc([p("a"), p("b")]));
	assert_eq!(next.selection(), Selection::caret(4));
}

#[test]
fn split_block_declines_outside_textblocks() {
	let state = EditorState::new(liquid("ab"));
	assert!(exec(split_block, &state).is_none());
}

#[test]
fn select_all_then_type() {
	let all = exec(select_all, &at(sample(), Selection::caret(1))).unwrap();
	assert_eq!(all.selection(), Selection::All { size: 8 });
	let tr = insert_text(&all, "z").unwrap();
	let typed = all.apply(&tr);
	assert_eq!(typed.doc(), &Node::doc([p("z")]));
	assert_eq!(typed.selection(), Selection::caret(2));
}

#[test]
fn commands_inside_plain_text_root() {
	let state = at(liquid("ab"), Selection::caret(0));
	assert!(exec(move_left, &state).is_none());
	assert!(exec(delete_backward, &state).is_none());
	let right = exec(move_right, &state).unwrap();
	assert_eq!(right.selection(), Selection::caret(1));
	let deleted = exec(delete_forward, &state).unwrap();
	assert_eq!(deleted.doc(), &liquid("b"));
}

#[test]
fn chain_stops_at_first_handler() {
	let state = at(sample(), Selection::caret(1));
	let mut seen = 0;
	let handled = chain(&[delete_backward, move_right], &state, Some(&mut |_tr: Transaction| seen += 1));
	assert!(handled);
	assert_eq!(seen, 1);
}

#[test]
fn chain_passes_dispatch_past_declining_commands() {
	let state = at(liquid("ab"), Selection::caret(0));
	let mut out = Vec::new();
	let handled = chain(
		&[move_left, delete_backward, move_right],
		&state,
		Some(&mut |tr: Transaction| out.push(tr)),
	);
	assert!(handled);
	assert_eq!(out.len(), 1);
	assert_eq!(out[0].selection(), Selection::caret(1));
	assert!(!chain(&[move_left, delete_backward], &state, None));
}

#[test]
fn base_keymap_binds_arrows() {
	use tagpad_primitives::{Key, KeyCode};

	let keymap = base_keymap();
	let command = *keymap.get(&Key::new(KeyCode::Right)).unwrap();
	let next = exec(command, &at(sample(), Selection::caret(1))).unwrap();
	assert_eq!(next.selection(), Selection::caret(2));
	assert!(keymap.get(&Key::char('x')).is_none());
}
