use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tagpad_editor::{EditorConfig, EditorState, FocusHandle, InputEvent, Transaction};
use tagpad_primitives::{Key, KeyCode, LiquidDelim, Node, Pos, Selection};

use super::*;
use crate::outer::OuterEditor;

/// Outer editor double that applies and records what it is asked to do.
struct RecordingOuter {
	state: EditorState,
	dispatched: Vec<Transaction>,
	focused: bool,
	undos: usize,
	redos: usize,
}

impl RecordingOuter {
	fn new(doc: Node) -> Self {
		Self {
			state: EditorState::new(doc),
			dispatched: Vec::new(),
			focused: false,
			undos: 0,
			redos: 0,
		}
	}

	fn edit(&mut self, build: impl FnOnce(&mut Transaction)) {
		let mut tr = self.state.tr();
		build(&mut tr);
		self.state = self.state.apply(&tr);
	}
}

impl OuterEditor for RecordingOuter {
	fn state(&self) -> &EditorState {
		&self.state
	}

	fn dispatch(&mut self, tr: Transaction) {
		self.state = self.state.apply(&tr);
		self.dispatched.push(tr);
	}

	fn focus(&mut self) {
		self.focused = true;
	}

	fn undo(&mut self) -> bool {
		self.undos += 1;
		true
	}

	fn redo(&mut self) -> bool {
		self.redos += 1;
		false
	}
}

fn liquid(text: &str) -> Node {
	Node::liquid(LiquidDelim::Tag, text)
}

fn line(children: impl IntoIterator<Item = Node>) -> Node {
	Node::doc([Node::paragraph(children)])
}

/// `0 <p> 1 a 2 b 3 <liquid> 4 x 5 </liquid> 6 c 7 </p> 8`
fn sample() -> Node {
	line([Node::text("ab"), liquid("x"), Node::text("c")])
}

fn mount(outer: &RecordingOuter, pos: Pos) -> (LiquidController, Rc<Cell<Option<Pos>>>) {
	let node = outer.state.doc().node_at(pos).unwrap();
	let cell = Rc::new(Cell::new(Some(pos)));
	let tracked = Rc::clone(&cell);
	let controller =
		LiquidController::new(node, Rc::new(move || tracked.get()), FocusHandle::new(), &EditorConfig::default())
			.unwrap();
	(controller, cell)
}

fn fragment(text: &str) -> Fragment {
	liquid(text).content().clone()
}

#[test]
fn sync_range_of_identical_content_is_none() {
	assert_eq!(sync_range(&fragment("abc"), &fragment("abc")), None);
	assert_eq!(sync_range(&fragment(""), &fragment("")), None);
}

#[rstest]
#[case::grow_repeated("aaa", "aa", 2, 3, 2)]
#[case::shrink_repeated("aa", "aaa", 2, 2, 3)]
#[case::replace_middle("abc", "axc", 1, 2, 2)]
#[case::fill_empty("ab", "", 0, 2, 0)]
#[case::clear("", "ab", 0, 0, 2)]
fn sync_range_cases(
	#[case] new: &str,
	#[case] old: &str,
	#[case] start: Pos,
	#[case] end_new: Pos,
	#[case] end_old: Pos,
) {
	assert_eq!(
		sync_range(&fragment(new), &fragment(old)),
		Some(SyncRange { start, end_new, end_old })
	);
}

#[test]
fn inner_length_excludes_boundaries() {
	let outer = RecordingOuter::new(sample());
	let (controller, _) = mount(&outer, 3);
	assert_eq!(controller.inner_length(), 1);
	assert_eq!(controller.inner().state().doc(), &liquid("x"));
	assert_eq!(controller.inner().state().selection(), Selection::caret(0));
}

#[test]
fn typing_inside_propagates_with_offset() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(controller.handle_text("y", &mut outer));
	assert_eq!(controller.inner().state().doc(), &liquid("yx"));
	assert_eq!(outer.dispatched.len(), 1);
	assert_eq!(outer.state.doc(), &line([Node::text("ab"), liquid("yx"), Node::text("c")]));
}

#[test]
fn newlines_become_spaces_on_both_sides() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	controller.handle_text("a\nb", &mut outer);
	assert_eq!(controller.inner().state().doc(), &liquid("a bx"));
	assert_eq!(outer.state.doc(), &line([Node::text("ab"), liquid("a bx"), Node::text("c")]));
}

#[test]
fn selection_changes_stay_inside() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(controller.handle_key(&Key::new(KeyCode::Right), &mut outer));
	assert_eq!(controller.inner().state().selection(), Selection::caret(1));
	assert!(outer.dispatched.is_empty());
}

#[test]
fn outside_change_syncs_without_echo() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	outer.edit(|tr| {
		tr.insert_text("z", 5, 5).unwrap();
	});
	let node = outer.state.doc().node_at(3).unwrap();
	assert!(controller.update(&node, &mut outer));
	assert_eq!(controller.inner().state().doc(), &liquid("xz"));
	assert_eq!(controller.node(), &node);
	assert!(outer.dispatched.is_empty());
}

#[test]
fn update_with_same_content_is_a_noop() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	let before = controller.inner().state().doc().clone();
	assert!(controller.update(&liquid("x"), &mut outer));
	assert_eq!(controller.inner().state().doc(), &before);
}

#[test]
fn update_refuses_other_markup() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(!controller.update(&Node::liquid(LiquidDelim::Output, "x"), &mut outer));
	assert!(!controller.update(&Node::paragraph([]), &mut outer));
}

#[test]
fn outside_newline_is_mirrored_without_dispatch() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	outer.edit(|tr| {
		tr.insert_text("\n", 5, 5).unwrap();
	});
	let node = outer.state.doc().node_at(3).unwrap();
	assert!(controller.update(&node, &mut outer));
	assert_eq!(controller.inner().state().doc(), &liquid("x\n"));
	assert_eq!(controller.inner().state().doc().content(), node.content());
	assert!(outer.dispatched.is_empty());
}

#[test]
fn escape_left_at_start() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(controller.handle_key(&Key::new(KeyCode::Left), &mut outer));
	assert_eq!(outer.state.selection(), Selection::caret(3));
	assert!(outer.focused);
}

#[test]
fn escape_right_only_at_end() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(!controller.maybe_escape(1, &mut outer));
	controller.set_selection(1, 1);
	assert!(controller.maybe_escape(1, &mut outer));
	assert_eq!(outer.state.selection(), Selection::caret(6));
	assert!(outer.focused);
}

#[test]
fn escape_ignores_ranges() {
	let mut outer = RecordingOuter::new(line([liquid("abc")]));
	let (mut controller, _) = mount(&outer, 1);
	controller.set_selection(0, 3);
	assert!(!controller.maybe_escape(-1, &mut outer));
	assert!(!controller.maybe_escape(1, &mut outer));
}

#[test]
fn backspace_in_empty_node_removes_it() {
	let mut outer = RecordingOuter::new(line([Node::text("ab"), liquid(""), Node::text("c")]));
	let (mut controller, _) = mount(&outer, 3);
	assert_eq!(controller.inner_length(), 0);
	assert!(controller.handle_key(&Key::new(KeyCode::Backspace), &mut outer));
	assert_eq!(outer.state.doc(), &line([Node::text("abc")]));
	assert_eq!(outer.state.selection(), Selection::caret(3));
	assert!(outer.focused);
}

#[test]
fn backspace_in_filled_node_edits_text() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	controller.set_selection(1, 1);
	assert!(controller.handle_key(&Key::new(KeyCode::Backspace), &mut outer));
	assert_eq!(controller.inner().state().doc(), &liquid(""));
	assert_eq!(outer.state.doc(), &line([Node::text("ab"), liquid(""), Node::text("c")]));
	assert!(!outer.focused);
}

#[test]
fn history_keys_reach_outer_history() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	assert!(controller.handle_key(&Key::ctrl('z'), &mut outer));
	assert_eq!(outer.undos, 1);
	// Nothing to redo, and ctrl-y has no base binding.
	assert!(!controller.handle_key(&Key::ctrl('y'), &mut outer));
	assert_eq!(outer.redos, 1);
}

#[test]
fn detached_node_keeps_edits_local() {
	let mut outer = RecordingOuter::new(sample());
	let (mut controller, cell) = mount(&outer, 3);
	cell.set(None);
	controller.handle_text("q", &mut outer);
	assert_eq!(controller.inner().state().doc(), &liquid("qx"));
	assert!(outer.dispatched.is_empty());
	assert!(!controller.maybe_escape(-1, &mut outer));
}

#[test]
fn select_node_resets_caret_and_focuses() {
	let outer = RecordingOuter::new(sample());
	let (mut controller, _) = mount(&outer, 3);
	controller.set_selection(1, 1);
	assert!(controller.inner().has_focus());
	controller.select_node();
	assert_eq!(controller.inner().state().selection(), Selection::caret(0));
	assert!(controller.inner().has_focus());
}

#[test]
fn claims_only_its_own_events() {
	let outer = RecordingOuter::new(sample());
	let (controller, _) = mount(&outer, 3);
	let id = controller.view_id();
	assert!(controller.stop_event(&InputEvent::text(id, "a")));
	assert!(!controller.stop_event(&InputEvent::text(tagpad_editor::ViewId(id.0 + 1), "a")));
	assert!(controller.ignore_mutation());
}

#[test]
fn renders_between_markers() {
	let outer = RecordingOuter::new(line([Node::liquid(LiquidDelim::Output, "name")]));
	let (controller, _) = mount(&outer, 1);
	assert_eq!(controller.render(), "{{name}}");
}

proptest! {
	#[test]
	fn update_converges_on_repetitive_text(old in "[ab]{0,6}", new in "[ab]{0,6}") {
		if let Some(range) = sync_range(&fragment(&new), &fragment(&old)) {
			prop_assert!(range.start <= range.end_new && range.end_new <= new.chars().count());
			prop_assert!(range.start <= range.end_old && range.end_old <= old.chars().count());
		}
		let mut outer = RecordingOuter::new(line([liquid(&old)]));
		let (mut controller, _) = mount(&outer, 1);
		prop_assert!(controller.update(&liquid(&new), &mut outer));
		prop_assert_eq!(controller.inner().state().doc().text_content(), new);
		prop_assert!(outer.dispatched.is_empty());
	}
}
