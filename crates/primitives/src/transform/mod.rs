//! Document transforms.
//!
//! A [`Transform`] accumulates [`Step`]s against a document, tracking the
//! document before each step and a [`Mapping`] over all step maps so
//! positions taken before the transform can be carried through it.

mod map;
mod step;

#[cfg(test)]
mod tests;

pub use map::{Bias, DelFlags, MapRange, MapResult, Mappable, Mapping, StepMap};
pub use step::Step;

use crate::Pos;
use crate::error::StepError;
use crate::node::{Fragment, Node};
use crate::schema::Attrs;
use crate::slice::Slice;

/// A sequence of steps applied to a document.
#[derive(Debug, Clone)]
pub struct Transform {
	doc: Node,
	docs: Vec<Node>,
	steps: Vec<Step>,
	mapping: Mapping,
}

impl Transform {
	/// Starts a transform on `doc`.
	pub fn new(doc: Node) -> Self {
		Self {
			doc,
			docs: Vec::new(),
			steps: Vec::new(),
			mapping: Mapping::new(),
		}
	}

	/// The current document.
	pub fn doc(&self) -> &Node {
		&self.doc
	}

	/// The document before the first step.
	pub fn before(&self) -> &Node {
		self.docs.first().unwrap_or(&self.doc)
	}

	/// Steps applied so far.
	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	/// The document before each step, parallel to [`Transform::steps`].
	pub fn docs(&self) -> &[Node] {
		&self.docs
	}

	/// Mapping over every step applied so far.
	pub fn mapping(&self) -> &Mapping {
		&self.mapping
	}

	/// Returns true if any step was applied.
	pub fn doc_changed(&self) -> bool {
		!self.steps.is_empty()
	}

	/// Applies a step, failing without changes if it does not apply.
	pub fn step(&mut self, step: Step) -> Result<&mut Self, StepError> {
		let doc = step.apply(&self.doc)?;
		self.push_step(step, doc);
		Ok(self)
	}

	fn push_step(&mut self, step: Step, doc: Node) {
		let before = std::mem::replace(&mut self.doc, doc);
		self.docs.push(before);
		self.mapping.append_map(step.step_map());
		self.steps.push(step);
	}

	/// Replaces `[from, to)` with `slice`. A no-op replace adds no step.
	pub fn replace(&mut self, from: Pos, to: Pos, slice: Slice) -> Result<&mut Self, StepError> {
		if from == to && slice.size() == 0 {
			return Ok(self);
		}
		self.step(Step::Replace { from, to, slice })
	}

	/// Deletes `[from, to)`.
	pub fn delete(&mut self, from: Pos, to: Pos) -> Result<&mut Self, StepError> {
		self.replace(from, to, Slice::empty())
	}

	/// Inserts whole nodes at `pos`.
	pub fn insert(&mut self, pos: Pos, content: impl Into<Fragment>) -> Result<&mut Self, StepError> {
		self.replace(pos, pos, Slice::closed(content.into()))
	}

	/// Replaces `[from, to)` with plain text. Empty text deletes the range.
	pub fn insert_text(&mut self, text: &str, from: Pos, to: Pos) -> Result<&mut Self, StepError> {
		if text.is_empty() {
			return self.delete(from, to);
		}
		self.replace(from, to, Slice::closed(Fragment::from(Node::text(text))))
	}

	/// Sets the attributes of the node at `pos`.
	pub fn set_node_attrs(&mut self, pos: Pos, attrs: Attrs) -> Result<&mut Self, StepError> {
		self.step(Step::SetAttrs { pos, attrs })
	}
}
