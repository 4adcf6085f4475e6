//! Immutable document tree.
//!
//! A [`Node`] is a cheaply clonable handle to shared, never-mutated data.
//! Edits produce new trees that share untouched subtrees with the old one.

mod diff;
mod fragment;


use std::fmt;
use std::sync::Arc;

pub use diff::DiffEnd;
pub use fragment::Fragment;
pub(crate) use fragment::push_joined;

use crate::error::{PositionError, ReplaceError};
use crate::resolved::ResolvedPos;
use crate::schema::{Attrs, ContentRule, LiquidDelim, NodeFlags, NodeKind, NodeSpec};
use crate::slice::Slice;
use crate::{Pos, replace};

static EMPTY_FRAGMENT: Fragment = Fragment::EMPTY;

/// A node in a document tree.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

#[derive(PartialEq, Eq)]
struct NodeData {
	kind: NodeKind,
	attrs: Attrs,
	body: Body,
}

#[derive(PartialEq, Eq)]
enum Body {
	/// Text with its cached char count.
	Text { text: String, chars: usize },
	Content(Fragment),
}

impl Node {
	/// Creates a non-text node.
	///
	/// Content is not validated here; replace operations validate the nodes
	/// they close.
	pub fn new(kind: NodeKind, attrs: Attrs, content: Fragment) -> Self {
		debug_assert!(kind != NodeKind::Text, "use Node::text for text nodes");
		Self(Arc::new(NodeData {
			kind,
			attrs,
			body: Body::Content(content),
		}))
	}

	/// Creates a text node.
	pub fn text(text: impl Into<String>) -> Self {
		let text = text.into();
		let chars = text.chars().count();
		Self(Arc::new(NodeData {
			kind: NodeKind::Text,
			attrs: Attrs::new(),
			body: Body::Text { text, chars },
		}))
	}

	/// Creates a document root from block children.
	pub fn doc(children: impl IntoIterator<Item = Node>) -> Self {
		Self::new(NodeKind::Doc, Attrs::new(), Fragment::from_nodes(children))
	}

	/// Creates a paragraph from inline children.
	pub fn paragraph(children: impl IntoIterator<Item = Node>) -> Self {
		Self::new(NodeKind::Paragraph, Attrs::new(), Fragment::from_nodes(children))
	}

	/// Creates a liquid node holding `source` as plain text.
	pub fn liquid(delim: LiquidDelim, source: &str) -> Self {
		let content = if source.is_empty() {
			Fragment::empty()
		} else {
			Fragment::from(Node::text(source))
		};
		Self::new(NodeKind::Liquid, delim.attrs(), content)
	}

	/// Returns the node's kind.
	pub fn kind(&self) -> NodeKind {
		self.0.kind
	}

	/// Returns the kind's descriptor.
	pub fn spec(&self) -> &'static NodeSpec {
		self.0.kind.spec()
	}

	/// Returns the node's attributes.
	pub fn attrs(&self) -> &Attrs {
		&self.0.attrs
	}

	/// Returns the node's children. Text nodes have none.
	pub fn content(&self) -> &Fragment {
		match &self.0.body {
			Body::Content(content) => content,
			Body::Text { .. } => &EMPTY_FRAGMENT,
		}
	}

	/// Returns the text of a text node.
	pub fn text_str(&self) -> Option<&str> {
		match &self.0.body {
			Body::Text { text, .. } => Some(text),
			Body::Content(_) => None,
		}
	}

	/// Returns true for text nodes.
	pub fn is_text(&self) -> bool {
		matches!(self.0.body, Body::Text { .. })
	}

	/// Returns true for inline nodes.
	pub fn is_inline(&self) -> bool {
		self.spec().flags.contains(NodeFlags::INLINE)
	}

	/// Returns true for block nodes.
	pub fn is_block(&self) -> bool {
		self.spec().flags.contains(NodeFlags::BLOCK)
	}

	/// Returns true for blocks holding inline content.
	pub fn is_textblock(&self) -> bool {
		self.spec().flags.contains(NodeFlags::TEXTBLOCK)
	}

	/// Returns true for nodes that cannot hold content.
	pub fn is_leaf(&self) -> bool {
		self.spec().content == ContentRule::Leaf
	}

	/// Returns true for nodes traversed as a unit: leaves and declared atoms.
	pub fn is_atom(&self) -> bool {
		self.is_leaf() || self.spec().flags.contains(NodeFlags::ATOM)
	}

	/// Returns true if the node's content is inline (text included).
	pub fn inline_content(&self) -> bool {
		matches!(self.spec().content, ContentRule::Inline | ContentRule::Text)
	}

	/// Size of the node in its parent's coordinate space.
	pub fn node_size(&self) -> usize {
		match &self.0.body {
			Body::Text { chars, .. } => *chars,
			Body::Content(_) if self.is_leaf() => 1,
			Body::Content(content) => content.size() + 2,
		}
	}

	/// Size of the node's content.
	pub fn content_size(&self) -> usize {
		self.content().size()
	}

	/// Number of children.
	pub fn child_count(&self) -> usize {
		self.content().child_count()
	}

	/// Returns the child at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn child(&self, index: usize) -> &Node {
		self.content().child(index)
	}

	/// Returns the child at `index`, if any.
	pub fn maybe_child(&self, index: usize) -> Option<&Node> {
		self.content().maybe_child(index)
	}

	/// Returns true if both nodes have the same kind and attributes.
	pub fn same_markup(&self, other: &Node) -> bool {
		self.0.kind == other.0.kind && self.0.attrs == other.0.attrs
	}

	/// Returns a node with the same markup and new content.
	pub fn copy(&self, content: Fragment) -> Node {
		match &self.0.body {
			Body::Content(current) if *current == content => self.clone(),
			_ => Node::new(self.0.kind, self.0.attrs.clone(), content),
		}
	}

	/// Returns a node of the same kind and content with different attributes.
	pub fn with_attrs(&self, attrs: Attrs) -> Node {
		Node::new(self.0.kind, attrs, self.content().clone())
	}

	/// Cuts out the part of this node between two content offsets.
	pub fn cut(&self, from: Pos, to: Pos) -> Node {
		match &self.0.body {
			Body::Text { text, chars } => {
				if from == 0 && to >= *chars {
					return self.clone();
				}
				Node::text(char_slice(text, from, to))
			}
			Body::Content(content) => {
				if from == 0 && to >= content.size() {
					return self.clone();
				}
				self.copy(content.cut(from, to))
			}
		}
	}

	/// Concatenated text of all descendants.
	pub fn text_content(&self) -> String {
		match &self.0.body {
			Body::Text { text, .. } => text.clone(),
			Body::Content(content) => content.text_content(),
		}
	}

	/// Resolves a position in this node's content.
	pub fn resolve(&self, pos: Pos) -> Result<ResolvedPos, PositionError> {
		ResolvedPos::resolve(self, pos)
	}

	/// Returns the node starting at `pos`, if any.
	pub fn node_at(&self, mut pos: Pos) -> Option<Node> {
		let mut node = self.clone();
		loop {
			let (index, offset) = node.content().find_index(pos).ok()?;
			let child = node.maybe_child(index)?.clone();
			if offset == pos || child.is_text() {
				return Some(child);
			}
			pos -= offset + 1;
			node = child;
		}
	}

	/// Cuts a slice out of this node's content between two positions.
	pub fn slice(&self, from: Pos, to: Pos) -> Result<Slice, PositionError> {
		if from == to {
			return Ok(Slice::empty());
		}
		let rfrom = self.resolve(from)?;
		let rto = self.resolve(to)?;
		let depth = rfrom.shared_depth(to);
		let start = rfrom.start(depth);
		let content = rfrom.node(depth).content().cut(rfrom.pos() - start, rto.pos() - start);
		Ok(Slice::new(content, rfrom.depth() - depth, rto.depth() - depth))
	}

	/// Replaces the range `[from, to)` with `slice`, returning the new tree.
	pub fn replace(&self, from: Pos, to: Pos, slice: &Slice) -> Result<Node, ReplaceError> {
		let rfrom = self.resolve(from)?;
		let rto = self.resolve(to)?;
		replace::replace(&rfrom, &rto, slice)
	}

	/// Calls `f` for every descendant with its absolute position, in document order.
	///
	/// Returning `false` from `f` skips the node's children.
	pub fn descendants<F>(&self, mut f: F)
	where
		F: FnMut(&Node, Pos) -> bool,
	{
		self.content().for_each_descendant(0, &mut f);
	}

	/// Validates `content` against this node's content rule.
	pub fn check_content(&self, content: &Fragment) -> Result<(), ReplaceError> {
		let spec = self.spec();
		if content.iter().all(|child| spec.allows(child.kind())) {
			Ok(())
		} else {
			Err(ReplaceError::InvalidContent(spec.name))
		}
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0.body {
			Body::Text { text, .. } => write!(f, "{text:?}"),
			Body::Content(content) => {
				write!(f, "{}", self.0.kind.name())?;
				if !self.0.attrs.is_empty() {
					f.write_str("[")?;
					for (i, (k, v)) in self.0.attrs.iter().enumerate() {
						if i > 0 {
							f.write_str(" ")?;
						}
						write!(f, "{k}={v}")?;
					}
					f.write_str("]")?;
				}
				if self.is_leaf() {
					return Ok(());
				}
				write!(f, "({content:?})")
			}
		}
	}
}

/// Returns the substring between two char offsets.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> &str {
	let byte = |idx: usize| text.char_indices().nth(idx).map_or(text.len(), |(b, _)| b);
	let start = byte(from);
	let end = if to <= from { start } else { byte(to) };
	&text[start..end]
}
