use std::fmt;

use super::Node;
use crate::Pos;
use crate::error::PositionError;

/// An ordered sequence of child nodes with a cached total size.
///
/// Fragments are normalized on construction: adjacent text nodes are merged
/// and empty text nodes are dropped, so equal content always has one shape.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Fragment {
	children: Vec<Node>,
	size: usize,
}

impl Fragment {
	/// The empty fragment.
	pub const EMPTY: Fragment = Fragment {
		children: Vec::new(),
		size: 0,
	};

	/// Returns an empty fragment.
	pub fn empty() -> Self {
		Self::EMPTY
	}

	/// Builds a normalized fragment from nodes.
	pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
		let mut children: Vec<Node> = Vec::new();
		for node in nodes {
			push_joined(&mut children, node);
		}
		let size = children.iter().map(Node::node_size).sum();
		Self { children, size }
	}

	/// Total size of the children.
	pub fn size(&self) -> usize {
		self.size
	}

	/// Number of children.
	pub fn child_count(&self) -> usize {
		self.children.len()
	}

	/// Returns the child at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn child(&self, index: usize) -> &Node {
		&self.children[index]
	}

	/// Returns the child at `index`, if any.
	pub fn maybe_child(&self, index: usize) -> Option<&Node> {
		self.children.get(index)
	}

	/// Iterates the children.
	pub fn iter(&self) -> std::slice::Iter<'_, Node> {
		self.children.iter()
	}

	/// First child, if any.
	pub fn first_child(&self) -> Option<&Node> {
		self.children.first()
	}

	/// Last child, if any.
	pub fn last_child(&self) -> Option<&Node> {
		self.children.last()
	}

	/// Concatenated text of all descendants.
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		for child in &self.children {
			match child.text_str() {
				Some(text) => out.push_str(text),
				None => out.push_str(&child.content().text_content()),
			}
		}
		out
	}

	/// Returns the part of this fragment between two offsets.
	pub fn cut(&self, from: Pos, to: Pos) -> Fragment {
		if from == 0 && to >= self.size {
			return self.clone();
		}
		let mut result = Vec::new();
		let mut pos = 0;
		if to > from {
			for child in &self.children {
				if pos >= to {
					break;
				}
				let end = pos + child.node_size();
				if end > from {
					let piece = if pos < from || end > to {
						if child.is_text() {
							child.cut(from.saturating_sub(pos), (to - pos).min(child.node_size()))
						} else {
							child.cut(from.saturating_sub(pos + 1), (to.saturating_sub(pos + 1)).min(child.content_size()))
						}
					} else {
						child.clone()
					};
					result.push(piece);
				}
				pos = end;
			}
		}
		Fragment::from_nodes(result)
	}

	/// Returns this fragment followed by `other`, joining text at the seam.
	pub fn append(&self, other: &Fragment) -> Fragment {
		if other.size == 0 && other.children.is_empty() {
			return self.clone();
		}
		if self.children.is_empty() {
			return other.clone();
		}
		Fragment::from_nodes(self.children.iter().chain(other.children.iter()).cloned())
	}

	/// Returns a copy with the child at `index` replaced.
	pub fn replace_child(&self, index: usize, node: Node) -> Fragment {
		let mut children = self.children.clone();
		children[index] = node;
		Fragment::from_nodes(children)
	}

	/// Finds the child index containing `pos` and the offset where that child starts.
	///
	/// A position on a child boundary resolves to the child after it.
	pub fn find_index(&self, pos: Pos) -> Result<(usize, Pos), PositionError> {
		if pos == 0 {
			return Ok((0, 0));
		}
		if pos == self.size {
			return Ok((self.children.len(), pos));
		}
		if pos > self.size {
			return Err(PositionError::OutOfRange { pos, size: self.size });
		}
		let mut cur = 0;
		for (index, child) in self.children.iter().enumerate() {
			let end = cur + child.node_size();
			if end >= pos {
				if end == pos {
					return Ok((index + 1, end));
				}
				return Ok((index, cur));
			}
			cur = end;
		}
		Err(PositionError::OutOfRange { pos, size: self.size })
	}

	/// Walks descendants in document order. `start` is the position of this
	/// fragment's first child.
	pub(super) fn for_each_descendant<F>(&self, start: Pos, f: &mut F)
	where
		F: FnMut(&Node, Pos) -> bool,
	{
		let mut pos = start;
		for child in &self.children {
			if f(child, pos) && child.content_size() > 0 {
				child.content().for_each_descendant(pos + 1, f);
			}
			pos += child.node_size();
		}
	}
}

impl From<Node> for Fragment {
	fn from(node: Node) -> Self {
		Fragment::from_nodes([node])
	}
}

impl<'a> IntoIterator for &'a Fragment {
	type Item = &'a Node;
	type IntoIter = std::slice::Iter<'a, Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.children.iter()
	}
}

impl fmt::Debug for Fragment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, child) in self.children.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{child:?}")?;
		}
		Ok(())
	}
}

/// Appends `node`, merging it into a preceding text node.
pub(crate) fn push_joined(target: &mut Vec<Node>, node: Node) {
	if node.is_text() && node.node_size() == 0 {
		return;
	}
	if let Some(last) = target.last_mut()
		&& let (Some(prev), Some(next)) = (last.text_str(), node.text_str())
	{
		let mut joined = String::with_capacity(prev.len() + next.len());
		joined.push_str(prev);
		joined.push_str(next);
		*last = Node::text(joined);
		return;
	}
	target.push(node);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::char_slice;

	#[test]
	fn adjacent_text_merges() {
		let frag = Fragment::from_nodes([Node::text("ab"), Node::text(""), Node::text("cd")]);
		assert_eq!(frag.child_count(), 1);
		assert_eq!(frag.size(), 4);
		assert_eq!(frag.text_content(), "abcd");
	}

	#[test]
	fn cut_text_by_chars() {
		let frag = Fragment::from(Node::text("héllo"));
		assert_eq!(frag.cut(1, 3).text_content(), "él");
		assert_eq!(char_slice("héllo", 4, 9), "o");
	}

	#[test]
	fn find_index_boundaries() {
		let frag = Fragment::from_nodes([Node::paragraph([Node::text("ab")]), Node::paragraph([])]);
		assert_eq!(frag.size(), 6);
		assert_eq!(frag.find_index(0), Ok((0, 0)));
		assert_eq!(frag.find_index(2), Ok((0, 0)));
		assert_eq!(frag.find_index(4), Ok((1, 4)));
		assert_eq!(frag.find_index(6), Ok((2, 6)));
		assert!(frag.find_index(7).is_err());
	}
}
