//! Transactions: transforms that also carry a selection and flags.
//!
//! A transaction starts from a state's document and selection. Steps added to
//! it map the starting selection forward lazily; an explicitly set selection
//! is mapped only through the steps added after it was set.

use bitflags::bitflags;
use tagpad_primitives::{
	Attrs, Bias, Fragment, Mappable, Mapping, Node, Pos, Selection, Slice, Step, StepError, Transform,
};


bitflags! {
	/// Metadata carried by a transaction.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct TxFlags: u8 {
		/// Synthesized to mirror a change that already happened elsewhere.
		/// Receivers must not propagate it back.
		const FROM_OUTSIDE = 1 << 0;
		/// The view should scroll the selection into view.
		const SCROLL_INTO_VIEW = 1 << 1;
		/// Not recorded in undo history.
		const NO_HISTORY = 1 << 2;
	}
}

/// An editor transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
	transform: Transform,
	selection: Selection,
	/// Number of steps `selection` has been mapped through.
	selection_for: usize,
	selection_set: bool,
	/// Offset inside a selected node where its own editor takes the caret.
	node_entry: Option<Pos>,
	flags: TxFlags,
}

impl Transaction {
	/// Starts a transaction on `doc` with `selection` as the current selection.
	pub fn new(doc: Node, selection: Selection) -> Self {
		Self {
			transform: Transform::new(doc),
			selection,
			selection_for: 0,
			selection_set: false,
			node_entry: None,
			flags: TxFlags::empty(),
		}
	}

	/// The current document.
	pub fn doc(&self) -> &Node {
		self.transform.doc()
	}

	/// The document the transaction started from.
	pub fn before(&self) -> &Node {
		self.transform.before()
	}

	/// Steps added so far.
	pub fn steps(&self) -> &[Step] {
		self.transform.steps()
	}

	/// Document before each step.
	pub fn docs(&self) -> &[Node] {
		self.transform.docs()
	}

	/// Mapping over all steps.
	pub fn mapping(&self) -> &Mapping {
		self.transform.mapping()
	}

	/// Returns true if any step was added.
	pub fn doc_changed(&self) -> bool {
		self.transform.doc_changed()
	}

	/// The selection, mapped through every step added after it was set.
	pub fn selection(&self) -> Selection {
		if self.selection_for < self.steps().len() {
			self.selection.map(self.doc(), &self.mapping().slice(self.selection_for))
		} else {
			self.selection
		}
	}

	/// Returns true if the selection was set explicitly.
	pub fn selection_set(&self) -> bool {
		self.selection_set
	}

	/// Replaces the selection.
	pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
		self.selection = selection;
		self.selection_for = self.steps().len();
		self.selection_set = true;
		self.node_entry = None;
		self
	}

	/// Asks the view of the node selected by this transaction to place its
	/// caret at `offset` within the node's content. Cleared by a later
	/// [`set_selection`](Self::set_selection).
	pub fn set_node_entry(&mut self, offset: Pos) -> &mut Self {
		self.node_entry = Some(offset);
		self
	}

	/// Caret offset requested for the selected node's view.
	pub fn node_entry(&self) -> Option<Pos> {
		self.node_entry
	}

	/// Applies a step. Fails without changes if it does not apply.
	pub fn step(&mut self, step: Step) -> Result<&mut Self, StepError> {
		self.transform.step(step)?;
		Ok(self)
	}

	/// Replaces `[from, to)` with `slice`.
	pub fn replace(&mut self, from: Pos, to: Pos, slice: Slice) -> Result<&mut Self, StepError> {
		self.transform.replace(from, to, slice)?;
		Ok(self)
	}

	/// Deletes `[from, to)`.
	pub fn delete(&mut self, from: Pos, to: Pos) -> Result<&mut Self, StepError> {
		self.transform.delete(from, to)?;
		Ok(self)
	}

	/// Replaces `[from, to)` with `text`.
	pub fn insert_text(&mut self, text: &str, from: Pos, to: Pos) -> Result<&mut Self, StepError> {
		self.transform.insert_text(text, from, to)?;
		Ok(self)
	}

	/// Sets the attributes of the node at `pos`.
	pub fn set_node_attrs(&mut self, pos: Pos, attrs: Attrs) -> Result<&mut Self, StepError> {
		self.transform.set_node_attrs(pos, attrs)?;
		Ok(self)
	}

	/// Deletes the selected content, leaving a selection near the deletion.
	///
	/// Deleting everything from a block document leaves one empty paragraph
	/// behind so the document keeps a caret position.
	pub fn delete_selection(&mut self) -> Result<&mut Self, StepError> {
		let sel = self.selection();
		if sel.is_empty() {
			return Ok(self);
		}
		let (from, to) = (sel.from(), sel.to());
		let whole_block_doc = matches!(sel, Selection::All { .. }) && !self.doc().inline_content();
		if whole_block_doc {
			self.replace(from, to, Slice::closed(Fragment::from(Node::paragraph([]))))?;
		} else {
			self.delete(from, to)?;
		}
		let pos = self.mapping().slice(self.steps().len() - 1).map(from, Bias::Left);
		let near = Selection::near(self.doc(), pos, Bias::Left);
		Ok(self.set_selection(near))
	}

	/// Replaces the selection with text, leaving a caret after it.
	///
	/// Replacing a whole block document wraps the text in a paragraph.
	pub fn replace_selection_with_text(&mut self, text: &str) -> Result<&mut Self, StepError> {
		let sel = self.selection();
		let (from, to) = (sel.from(), sel.to());
		let chars = text.chars().count();
		if matches!(sel, Selection::All { .. }) && !self.doc().inline_content() {
			let para = Node::paragraph([Node::text(text)]);
			self.replace(from, to, Slice::closed(Fragment::from(para)))?;
			return Ok(self.set_selection(Selection::caret(1 + chars)));
		}
		self.insert_text(text, from, to)?;
		Ok(self.set_selection(Selection::caret(from + chars)))
	}

	/// Asks the view to scroll the selection into view.
	pub fn scroll_into_view(&mut self) -> &mut Self {
		self.flags |= TxFlags::SCROLL_INTO_VIEW;
		self
	}

	/// Returns true if the view should scroll the selection into view.
	pub fn scrolled_into_view(&self) -> bool {
		self.flags.contains(TxFlags::SCROLL_INTO_VIEW)
	}

	/// Marks the transaction as mirroring a change made elsewhere.
	pub fn set_from_outside(&mut self) -> &mut Self {
		self.flags |= TxFlags::FROM_OUTSIDE;
		self
	}

	/// Returns true if the transaction mirrors a change made elsewhere.
	pub fn is_from_outside(&self) -> bool {
		self.flags.contains(TxFlags::FROM_OUTSIDE)
	}

	/// Controls whether the transaction is recorded in undo history.
	pub fn set_add_to_history(&mut self, add: bool) -> &mut Self {
		self.flags.set(TxFlags::NO_HISTORY, !add);
		self
	}

	/// Returns true if the transaction should be recorded in undo history.
	pub fn add_to_history(&self) -> bool {
		!self.flags.contains(TxFlags::NO_HISTORY)
	}

	/// The transaction's flags.
	pub fn flags(&self) -> TxFlags {
		self.flags
	}
}
