use super::map::{Bias, MapRange, Mappable, StepMap};
use crate::Pos;
use crate::error::StepError;
use crate::node::{Fragment, Node};
use crate::schema::Attrs;
use crate::slice::Slice;

/// An atomic document edit.
///
/// Steps are plain data: they can be applied to a document, inverted against
/// the document they were applied to, and remapped to apply the same logical
/// edit at a different coordinate origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	/// Replace `[from, to)` with `slice`.
	Replace {
		/// Start of the replaced range.
		from: Pos,
		/// End of the replaced range.
		to: Pos,
		/// Inserted content.
		slice: Slice,
	},
	/// Set the attributes of the node starting at `pos`.
	SetAttrs {
		/// Position directly before the node.
		pos: Pos,
		/// The node's new attributes.
		attrs: Attrs,
	},
}

impl Step {
	/// Applies the step, returning the new document.
	pub fn apply(&self, doc: &Node) -> Result<Node, StepError> {
		match self {
			Step::Replace { from, to, slice } => Ok(doc.replace(*from, *to, slice)?),
			Step::SetAttrs { pos, attrs } => {
				let node = doc.node_at(*pos).ok_or(StepError::NoNodeAt(*pos))?;
				if node.is_text() {
					return Err(StepError::TextAttrs(*pos));
				}
				// An empty copy with the new attributes, open at its end so the
				// old content is joined back in.
				let updated = Node::new(node.kind(), attrs.clone(), Fragment::empty());
				let open_end = if node.is_leaf() { 0 } else { 1 };
				let slice = Slice::new(Fragment::from(updated), 0, open_end);
				Ok(doc.replace(*pos, *pos + 1, &slice)?)
			}
		}
	}

	/// The position changes this step makes.
	pub fn step_map(&self) -> StepMap {
		match self {
			Step::Replace { from, to, slice } => StepMap::new([MapRange {
				start: *from,
				old_size: to - from,
				new_size: slice.size(),
			}]),
			Step::SetAttrs { .. } => StepMap::empty(),
		}
	}

	/// Returns the step that undoes this one. `doc` is the document the step
	/// was applied to.
	pub fn invert(&self, doc: &Node) -> Result<Step, StepError> {
		match self {
			Step::Replace { from, to, slice } => Ok(Step::Replace {
				from: *from,
				to: from + slice.size(),
				slice: doc.slice(*from, *to)?,
			}),
			Step::SetAttrs { pos, .. } => {
				let node = doc.node_at(*pos).ok_or(StepError::NoNodeAt(*pos))?;
				Ok(Step::SetAttrs {
					pos: *pos,
					attrs: node.attrs().clone(),
				})
			}
		}
	}

	/// Maps the step through `mapping`. Returns `None` when the content the
	/// step applied to was deleted.
	pub fn map(&self, mapping: &impl Mappable) -> Option<Step> {
		match self {
			Step::Replace { from, to, slice } => {
				let from = mapping.map_result(*from, Bias::Right);
				let to = mapping.map_result(*to, Bias::Left);
				if from.deleted_across() && to.deleted_across() {
					return None;
				}
				Some(Step::Replace {
					from: from.pos,
					to: from.pos.max(to.pos),
					slice: slice.clone(),
				})
			}
			Step::SetAttrs { pos, attrs } => {
				let mapped = mapping.map_result(*pos, Bias::Right);
				if mapped.deleted_after() {
					return None;
				}
				Some(Step::SetAttrs {
					pos: mapped.pos,
					attrs: attrs.clone(),
				})
			}
		}
	}
}
