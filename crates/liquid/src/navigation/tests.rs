use pretty_assertions::assert_eq;
use rstest::rstest;
use tagpad_editor::{EditorState, Transaction};
use tagpad_primitives::{Key, KeyCode, LiquidDelim, Node, Selection};

use super::*;

/// `0 <p> 1 a 2 b 3 <liquid> 4 x 5 </liquid> 6 c 7 </p> 8`
fn sample() -> EditorState {
	EditorState::new(Node::doc([Node::paragraph([
		Node::text("ab"),
		Node::liquid(LiquidDelim::Tag, "x"),
		Node::text("c"),
	])]))
}

fn at(state: EditorState, sel: Selection) -> EditorState {
	let mut tr = state.tr();
	tr.set_selection(sel);
	state.apply(&tr)
}

fn press(keymap: &Keymap<Command>, code: KeyCode, state: &EditorState) -> Option<Transaction> {
	let command = keymap.get(&Key::new(code)).copied()?;
	let mut out = None;
	let handled = command(state, Some(&mut |tr: Transaction| out = Some(tr)));
	assert_eq!(handled, out.is_some());
	out
}

#[rstest]
#[case::right_from_before(KeyCode::Right, 3, 0)]
#[case::down_from_before(KeyCode::Down, 3, 0)]
#[case::left_from_after(KeyCode::Left, 6, 1)]
#[case::up_from_after(KeyCode::Up, 6, 1)]
fn steps_into_adjacent_atom(#[case] code: KeyCode, #[case] caret: usize, #[case] entry: usize) {
	let state = at(sample(), Selection::caret(caret));
	let tr = press(&boundary_keymap(), code, &state).unwrap();
	assert_eq!(tr.selection(), Selection::Node { from: 3, to: 6 });
	assert_eq!(tr.node_entry(), Some(entry));
	assert!(tr.scrolled_into_view());
	assert!(!tr.doc_changed());
}

#[rstest]
#[case::left_from_before(KeyCode::Left, 3)]
#[case::right_from_after(KeyCode::Right, 6)]
#[case::inside_text(KeyCode::Right, 1)]
#[case::paragraph_start(KeyCode::Left, 1)]
#[case::paragraph_end(KeyCode::Right, 7)]
fn declines_without_adjacent_atom(#[case] code: KeyCode, #[case] caret: usize) {
	let state = at(sample(), Selection::caret(caret));
	assert!(press(&boundary_keymap(), code, &state).is_none());
}

#[test]
fn declines_for_non_collapsed_selections() {
	let ranged = at(sample(), Selection::text(2, 3));
	assert!(!arrow_right(&ranged, None));
	let node = at(sample(), Selection::Node { from: 3, to: 6 });
	assert!(!arrow_left(&node, None));
	assert!(!arrow_right(&node, None));
}

#[test]
fn query_without_dispatch_reports_applicability() {
	let state = at(sample(), Selection::caret(3));
	assert!(arrow_right(&state, None));
	assert_eq!(state.selection(), Selection::caret(3));
}

#[test]
fn binds_exactly_the_arrows() {
	let keymap = boundary_keymap();
	assert_eq!(keymap.len(), 4);
	assert!(keymap.get(&Key::new(KeyCode::Backspace)).is_none());
	assert!(keymap.get(&Key::new(KeyCode::Left).with_shift()).is_none());
}

#[test]
fn entering_from_the_right_lands_after_the_content() {
	let state = EditorState::new(Node::doc([Node::paragraph([
		Node::text("ab"),
		Node::liquid(LiquidDelim::Tag, "xyz"),
	])]));
	let state = at(state, Selection::caret(8));
	let tr = press(&boundary_keymap(), KeyCode::Left, &state).unwrap();
	assert_eq!(tr.selection(), Selection::Node { from: 3, to: 8 });
	assert_eq!(tr.node_entry(), Some(3));
}
