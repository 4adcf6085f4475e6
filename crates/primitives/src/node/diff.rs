//! Structural diffing of fragments.

use super::Fragment;
use crate::Pos;

/// End offsets of a difference, one per compared side.
///
/// Scanning backward, both fragments are identical from `a` (in the first
/// fragment) and `b` (in the second) to their ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEnd {
	/// End offset in the fragment `find_diff_end` was called on.
	pub a: Pos,
	/// End offset in the other fragment.
	pub b: Pos,
}

impl Fragment {
	/// First position at which this fragment and `other` differ, or `None` if
	/// they are identical.
	pub fn find_diff_start(&self, other: &Fragment) -> Option<Pos> {
		diff_start(self, other, 0)
	}

	/// Positions, per side, from which this fragment and `other` are identical
	/// up to their ends, or `None` if they are identical.
	pub fn find_diff_end(&self, other: &Fragment) -> Option<DiffEnd> {
		diff_end(self, other, self.size(), other.size())
	}
}

fn diff_start(a: &Fragment, b: &Fragment, mut pos: Pos) -> Option<Pos> {
	let mut index = 0;
	loop {
		if index == a.child_count() || index == b.child_count() {
			return (a.child_count() != b.child_count()).then_some(pos);
		}
		let (child_a, child_b) = (a.child(index), b.child(index));
		index += 1;

		if child_a == child_b {
			pos += child_a.node_size();
			continue;
		}
		if !child_a.same_markup(child_b) {
			return Some(pos);
		}
		if let (Some(text_a), Some(text_b)) = (child_a.text_str(), child_b.text_str()) {
			let same = text_a.chars().zip(text_b.chars()).take_while(|(x, y)| x == y).count();
			return Some(pos + same);
		}
		if (child_a.content_size() > 0 || child_b.content_size() > 0)
			&& let Some(inner) = diff_start(child_a.content(), child_b.content(), pos + 1)
		{
			return Some(inner);
		}
		pos += child_a.node_size();
	}
}

fn diff_end(a: &Fragment, b: &Fragment, mut pos_a: Pos, mut pos_b: Pos) -> Option<DiffEnd> {
	let (mut index_a, mut index_b) = (a.child_count(), b.child_count());
	loop {
		if index_a == 0 || index_b == 0 {
			return (index_a != index_b).then_some(DiffEnd { a: pos_a, b: pos_b });
		}
		index_a -= 1;
		index_b -= 1;
		let (child_a, child_b) = (a.child(index_a), b.child(index_b));
		let size = child_a.node_size();

		if child_a == child_b {
			pos_a -= size;
			pos_b -= size;
			continue;
		}
		if !child_a.same_markup(child_b) {
			return Some(DiffEnd { a: pos_a, b: pos_b });
		}
		if let (Some(text_a), Some(text_b)) = (child_a.text_str(), child_b.text_str()) {
			let same = text_a.chars().rev().zip(text_b.chars().rev()).take_while(|(x, y)| x == y).count();
			return Some(DiffEnd {
				a: pos_a - same,
				b: pos_b - same,
			});
		}
		if (child_a.content_size() > 0 || child_b.content_size() > 0)
			&& let Some(inner) = diff_end(child_a.content(), child_b.content(), pos_a - 1, pos_b - 1)
		{
			return Some(inner);
		}
		pos_a -= size;
		pos_b -= size;
	}
}
