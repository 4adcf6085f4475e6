use crate::Pos;
use crate::error::PositionError;
use crate::node::Node;
use crate::resolved::ResolvedPos;
use crate::transform::{Bias, Mappable};


/// The selected part of a document.
///
/// Every selection has an anchor (the side that stays put when extending)
/// and a head (the side that moves). A collapsed text selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
	/// A text range between two inline positions.
	Text {
		/// Fixed side.
		anchor: Pos,
		/// Moving side.
		head: Pos,
	},
	/// A single node selected as a unit.
	Node {
		/// Position directly before the node.
		from: Pos,
		/// Position directly after the node.
		to: Pos,
	},
	/// The whole document.
	All {
		/// Content size of the document.
		size: usize,
	},
}

impl Selection {
	/// A collapsed caret at `pos`.
	pub const fn caret(pos: Pos) -> Self {
		Self::Text { anchor: pos, head: pos }
	}

	/// A text selection from `anchor` to `head`.
	pub const fn text(anchor: Pos, head: Pos) -> Self {
		Self::Text { anchor, head }
	}

	/// Selects the node starting at `pos`.
	pub fn node(doc: &Node, pos: Pos) -> Result<Self, PositionError> {
		let node = doc.node_at(pos).ok_or(PositionError::OutOfRange {
			pos,
			size: doc.content_size(),
		})?;
		Ok(Self::Node {
			from: pos,
			to: pos + node.node_size(),
		})
	}

	/// Selects the whole document.
	pub fn all(doc: &Node) -> Self {
		Self::All {
			size: doc.content_size(),
		}
	}

	/// The first valid selection in `doc`.
	pub fn at_start(doc: &Node) -> Self {
		find_caret(doc, 0, Bias::Right).map_or_else(|| Self::all(doc), Self::caret)
	}

	/// The last valid selection in `doc`.
	pub fn at_end(doc: &Node) -> Self {
		find_caret(doc, doc.content_size(), Bias::Left).map_or_else(|| Self::all(doc), Self::caret)
	}

	/// Finds a valid selection at or near `pos`, searching in the direction
	/// of `bias` first.
	///
	/// A position inside an atom selects the outermost such atom as a node.
	/// Positions whose parent takes inline content become carets. Anywhere
	/// else the nearest caret is searched for, first towards `bias` and then
	/// the other way, and the whole document is selected if none exists.
	pub fn near(doc: &Node, pos: Pos, bias: Bias) -> Self {
		let pos = pos.min(doc.content_size());
		let Ok(rp) = doc.resolve(pos) else {
			return Self::all(doc);
		};
		if let Some(depth) = rp.atom_ancestor()
			&& let (Some(from), Some(to)) = (rp.before(depth), rp.after(depth))
		{
			return Self::Node { from, to };
		}
		find_caret(doc, pos, bias)
			.or_else(|| find_caret(doc, pos, bias.flip()))
			.map_or_else(|| Self::all(doc), Self::caret)
	}

	/// Lower bound of the selected range.
	pub fn from(&self) -> Pos {
		match *self {
			Self::Text { anchor, head } => anchor.min(head),
			Self::Node { from, .. } => from,
			Self::All { .. } => 0,
		}
	}

	/// Upper bound of the selected range.
	pub fn to(&self) -> Pos {
		match *self {
			Self::Text { anchor, head } => anchor.max(head),
			Self::Node { to, .. } => to,
			Self::All { size } => size,
		}
	}

	/// The fixed side of the selection.
	pub fn anchor(&self) -> Pos {
		match *self {
			Self::Text { anchor, .. } => anchor,
			_ => self.from(),
		}
	}

	/// The moving side of the selection.
	pub fn head(&self) -> Pos {
		match *self {
			Self::Text { head, .. } => head,
			_ => self.to(),
		}
	}

	/// Returns true if nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.from() == self.to()
	}

	/// Returns the caret position of a collapsed text selection.
	pub fn caret_pos(&self) -> Option<Pos> {
		match *self {
			Self::Text { anchor, head } if anchor == head => Some(head),
			_ => None,
		}
	}

	/// Maps the selection through document changes. `doc` is the document
	/// after the changes.
	pub fn map(&self, doc: &Node, mapping: &impl Mappable) -> Self {
		match *self {
			Self::Text { anchor, head } => {
				let head = mapping.map(head, Bias::Right);
				let anchor = mapping.map(anchor, Bias::Right);
				if is_valid_caret(doc, head) && is_valid_caret(doc, anchor) {
					Self::Text { anchor, head }
				} else {
					Self::near(doc, head, Bias::Right)
				}
			}
			Self::Node { from, .. } => {
				let mapped = mapping.map_result(from, Bias::Right);
				if !mapped.deleted()
					&& let Ok(sel) = Self::node(doc, mapped.pos)
				{
					return sel;
				}
				Self::near(doc, mapped.pos, Bias::Right)
			}
			Self::All { .. } => Self::all(doc),
		}
	}
}

/// Returns true if a caret may sit at `pos`: inside inline content and not
/// inside an atom.
pub fn is_valid_caret(doc: &Node, pos: Pos) -> bool {
	doc.resolve(pos).is_ok_and(|rp| is_caret_position(&rp))
}

fn is_caret_position(rp: &ResolvedPos) -> bool {
	rp.parent().inline_content() && rp.atom_ancestor().is_none()
}

/// Scans from `pos` towards `bias` for the first valid caret position.
fn find_caret(doc: &Node, pos: Pos, bias: Bias) -> Option<Pos> {
	let size = doc.content_size();
	let valid = |p: Pos| is_valid_caret(doc, p);
	match bias {
		Bias::Right => (pos..=size).find(|&p| valid(p)),
		Bias::Left => (0..=pos.min(size)).rev().find(|&p| valid(p)),
	}
}
