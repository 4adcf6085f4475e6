use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::schema::LiquidDelim;

fn p(text: &str) -> Node {
	Node::paragraph([Node::text(text)])
}

fn sample() -> Node {
	// 0 <p> 1 a 2 b 3 <liquid> 4 x 5 </liquid> 6 c 7 </p> 8
	Node::doc([Node::paragraph([
		Node::text("ab"),
		Node::liquid(LiquidDelim::Tag, "x"),
		Node::text("c"),
	])])
}

#[test]
fn offset_map_shifts_every_position() {
	let map = StepMap::offset(4);
	assert_eq!(map.map(0, Bias::Left), 0);
	assert_eq!(map.map(0, Bias::Right), 4);
	assert_eq!(map.map(3, Bias::Left), 7);
	assert_eq!(StepMap::offset(0), StepMap::empty());
}

#[test]
fn map_result_flags() {
	let map = StepMap::new([MapRange {
		start: 2,
		old_size: 4,
		new_size: 1,
	}]);
	let inside = map.map_result(4, Bias::Right);
	assert!(inside.deleted_across());
	assert!(inside.deleted());
	assert_eq!(inside.pos, 3);
	assert_eq!(map.map_result(4, Bias::Left).pos, 2);

	let at_start = map.map_result(2, Bias::Left);
	assert!(at_start.deleted_after());
	assert!(!at_start.deleted());
	assert_eq!(map.map(8, Bias::Left), 5);
}

#[test]
fn mapping_composes_and_slices() {
	let mut mapping = Mapping::new();
	mapping.append_map(StepMap::offset(1));
	mapping.append_map(StepMap::offset(2));
	assert_eq!(mapping.map(5, Bias::Right), 8);
	assert_eq!(mapping.slice(1).map(5, Bias::Right), 7);
	assert!(mapping.slice(5).is_empty());
}

#[test]
fn transform_tracks_docs_and_mapping() {
	let mut tr = Transform::new(sample());
	tr.insert_text("Z", 1, 1).unwrap().delete(4, 7).unwrap();
	assert_eq!(tr.steps().len(), 2);
	assert_eq!(tr.docs().len(), 2);
	assert_eq!(tr.before(), &sample());
	assert_eq!(tr.doc(), &Node::doc([p("Zabc")]));
	assert_eq!(tr.mapping().map(7, Bias::Right), 5);
}

#[test]
fn failed_step_leaves_transform_untouched() {
	let mut tr = Transform::new(sample());
	let err = tr.insert_text("x", 0, 0).unwrap_err();
	assert!(matches!(err, StepError::Replace(_)));
	assert!(!tr.doc_changed());
	assert_eq!(tr.doc(), &sample());
}

#[test]
fn noop_replace_adds_no_step() {
	let mut tr = Transform::new(sample());
	tr.delete(2, 2).unwrap();
	assert!(!tr.doc_changed());
}

#[test]
fn set_attrs_keeps_content() {
	let mut tr = Transform::new(sample());
	tr.set_node_attrs(3, LiquidDelim::Output.attrs()).unwrap();
	let node = tr.doc().node_at(3).unwrap();
	assert_eq!(LiquidDelim::from_attrs(node.attrs()), LiquidDelim::Output);
	assert_eq!(node.text_content(), "x");
	assert_eq!(tr.mapping().map(6, Bias::Right), 6);
}

#[test]
fn set_attrs_rejects_text_and_missing_nodes() {
	let mut tr = Transform::new(sample());
	assert_eq!(tr.set_node_attrs(1, Attrs::new()).unwrap_err(), StepError::TextAttrs(1));
	assert_eq!(tr.set_node_attrs(50, Attrs::new()).unwrap_err(), StepError::NoNodeAt(50));
}

#[test]
fn invert_set_attrs_restores_old_attrs() {
	let doc = sample();
	let step = Step::SetAttrs {
		pos: 3,
		attrs: LiquidDelim::Output.attrs(),
	};
	let after = step.apply(&doc).unwrap();
	let undone = step.invert(&doc).unwrap().apply(&after).unwrap();
	assert_eq!(undone, doc);
}

#[test]
fn map_step_through_offset() {
	let step = Step::Replace {
		from: 1,
		to: 2,
		slice: Slice::closed(Fragment::from(Node::text("q"))),
	};
	let mapped = step.map(&StepMap::offset(4)).unwrap();
	assert_eq!(
		mapped,
		Step::Replace {
			from: 5,
			to: 6,
			slice: Slice::closed(Fragment::from(Node::text("q"))),
		}
	);
}

#[test]
fn map_step_over_deleted_range_drops_it() {
	let step = Step::Replace {
		from: 3,
		to: 4,
		slice: Slice::empty(),
	};
	let deletion = StepMap::new([MapRange {
		start: 1,
		old_size: 6,
		new_size: 0,
	}]);
	assert_eq!(step.map(&deletion), None);
}

fn text_step() -> impl Strategy<Value = (String, usize, usize, String)> {
	("[a-c]{0,8}", "[a-c]{0,3}").prop_flat_map(|(text, insert)| {
		let len = text.chars().count();
		(Just(text), 0..=len, 0..=len, Just(insert))
	})
}

proptest! {
	#[test]
	fn invert_undoes_text_replace((text, a, b, insert) in text_step()) {
		let doc = Node::doc([p(&text)]);
		let (from, to) = (a.min(b) + 1, a.max(b) + 1);
		let slice = if insert.is_empty() {
			Slice::empty()
		} else {
			Slice::closed(Fragment::from(Node::text(insert)))
		};
		let step = Step::Replace { from, to, slice };
		let after = step.apply(&doc).unwrap();
		let inverse = step.invert(&doc).unwrap();
		prop_assert_eq!(inverse.apply(&after).unwrap(), doc);
	}

	#[test]
	fn mapping_is_monotonic(
		start in 0usize..20,
		old_size in 0usize..10,
		new_size in 0usize..10,
		a in 0usize..40,
		b in 0usize..40,
	) {
		let map = StepMap::new([MapRange { start, old_size, new_size }]);
		let (lo, hi) = (a.min(b), a.max(b));
		for bias in [Bias::Left, Bias::Right] {
			prop_assert!(map.map(lo, bias) <= map.map(hi, bias));
		}
	}
}
