use std::sync::Arc;

use pretty_assertions::assert_eq;
use tagpad_primitives::{LiquidDelim, Selection};

use super::*;

#[test]
fn single_line_replaces_newlines() {
	let doc = Node::liquid(LiquidDelim::Tag, "ab");
	let state = EditorState::with_plugins(doc, vec![Arc::new(SingleLine)]);
	let mut tr = state.tr();
	tr.insert_text("x\ny\n", 1, 1).unwrap();
	let applied = state.apply_transaction(tr);
	assert_eq!(applied.transactions.len(), 2);
	assert_eq!(applied.state.doc().text_content(), "ax y b");
	assert_eq!(applied.state.selection(), Selection::caret(0));
}

#[test]
fn single_line_ignores_selection_only_changes() {
	let doc = Node::liquid(LiquidDelim::Tag, "a\nb");
	let state = EditorState::with_plugins(doc, vec![Arc::new(SingleLine)]);
	let mut tr = state.tr();
	tr.set_selection(Selection::caret(1));
	let applied = state.apply_transaction(tr);
	assert_eq!(applied.transactions.len(), 1);
	assert_eq!(applied.state.doc().text_content(), "a\nb");
}

#[test]
fn single_line_leaves_outside_changes_alone() {
	let doc = Node::liquid(LiquidDelim::Tag, "ab");
	let state = EditorState::with_plugins(doc, vec![Arc::new(SingleLine)]);
	let mut tr = state.tr();
	tr.insert_text("\n", 1, 1).unwrap();
	tr.set_from_outside();
	let applied = state.apply_transaction(tr);
	assert_eq!(applied.transactions.len(), 1);
	assert_eq!(applied.state.doc().text_content(), "a\nb");
}
