//! Positions resolved into their ancestor path.

use smallvec::SmallVec;

use crate::Pos;
use crate::error::PositionError;
use crate::node::Node;

#[derive(Debug, Clone)]
struct Level {
	/// Ancestor node at this depth.
	node: Node,
	/// Index of the child the position points into.
	index: usize,
	/// Absolute position where that child starts.
	offset: Pos,
}

/// A position together with the chain of nodes that contain it.
///
/// Depth 0 is the root the position was resolved against; [`ResolvedPos::depth`]
/// is the innermost non-text node containing the position.
#[derive(Debug, Clone)]
pub struct ResolvedPos {
	pos: Pos,
	path: SmallVec<[Level; 4]>,
	parent_offset: usize,
}

impl ResolvedPos {
	pub(crate) fn resolve(doc: &Node, pos: Pos) -> Result<Self, PositionError> {
		if pos > doc.content_size() {
			return Err(PositionError::OutOfRange {
				pos,
				size: doc.content_size(),
			});
		}
		let mut path: SmallVec<[Level; 4]> = SmallVec::new();
		let mut start = 0;
		let mut parent_offset = pos;
		let mut node = doc.clone();
		loop {
			let (index, offset) = node.content().find_index(parent_offset)?;
			let rem = parent_offset - offset;
			path.push(Level {
				node: node.clone(),
				index,
				offset: start + offset,
			});
			if rem == 0 {
				break;
			}
			let child = node.child(index).clone();
			if child.is_text() {
				break;
			}
			parent_offset = rem - 1;
			start += offset + 1;
			node = child;
		}
		Ok(Self { pos, path, parent_offset })
	}

	/// The absolute position.
	pub fn pos(&self) -> Pos {
		self.pos
	}

	/// Depth of the innermost containing node.
	pub fn depth(&self) -> usize {
		self.path.len() - 1
	}

	/// Offset into the parent node's content.
	pub fn parent_offset(&self) -> usize {
		self.parent_offset
	}

	/// The innermost containing node.
	pub fn parent(&self) -> &Node {
		self.node(self.depth())
	}

	/// The root node the position was resolved against.
	pub fn doc(&self) -> &Node {
		self.node(0)
	}

	/// Ancestor at `depth`.
	pub fn node(&self, depth: usize) -> &Node {
		&self.path[depth].node
	}

	/// Index into the ancestor at `depth`.
	pub fn index(&self, depth: usize) -> usize {
		self.path[depth].index
	}

	/// Index pointing after this position into the ancestor at `depth`.
	pub fn index_after(&self, depth: usize) -> usize {
		let index = self.index(depth);
		if depth == self.depth() && self.text_offset() == 0 {
			index
		} else {
			index + 1
		}
	}

	/// Absolute position at which the content of the ancestor at `depth` starts.
	pub fn start(&self, depth: usize) -> Pos {
		if depth == 0 { 0 } else { self.path[depth - 1].offset + 1 }
	}

	/// Absolute position at which the content of the ancestor at `depth` ends.
	pub fn end(&self, depth: usize) -> Pos {
		self.start(depth) + self.node(depth).content_size()
	}

	/// Position directly before the ancestor at `depth`. The root has none.
	pub fn before(&self, depth: usize) -> Option<Pos> {
		match depth {
			0 => None,
			d if d == self.depth() + 1 => Some(self.pos),
			d => Some(self.path[d - 1].offset),
		}
	}

	/// Position directly after the ancestor at `depth`. The root has none.
	pub fn after(&self, depth: usize) -> Option<Pos> {
		match depth {
			0 => None,
			d if d == self.depth() + 1 => Some(self.pos + self.node_after()?.node_size()),
			d => Some(self.path[d - 1].offset + self.node(d).node_size()),
		}
	}

	/// Offset into the text node the position points into, 0 when between nodes.
	pub fn text_offset(&self) -> usize {
		self.pos - self.path[self.depth()].offset
	}

	/// Node directly after the position; a text node is cut at the position.
	pub fn node_after(&self) -> Option<Node> {
		let parent = self.parent();
		let index = self.index(self.depth());
		let child = parent.maybe_child(index)?;
		let offset = self.text_offset();
		if offset > 0 {
			Some(child.cut(offset, child.node_size()))
		} else {
			Some(child.clone())
		}
	}

	/// Node directly before the position; a text node is cut at the position.
	pub fn node_before(&self) -> Option<Node> {
		let parent = self.parent();
		let index = self.index(self.depth());
		let offset = self.text_offset();
		if offset > 0 {
			return Some(parent.child(index).cut(0, offset));
		}
		if index == 0 { None } else { Some(parent.child(index - 1).clone()) }
	}

	/// Deepest depth whose node contains both this position and `pos`.
	pub fn shared_depth(&self, pos: Pos) -> usize {
		(1..=self.depth())
			.rev()
			.find(|&depth| self.start(depth) <= pos && self.end(depth) >= pos)
			.unwrap_or(0)
	}

	/// Shallowest depth (from 1) whose node is an atom, if the position lies
	/// inside one.
	pub fn atom_ancestor(&self) -> Option<usize> {
		(1..=self.depth()).find(|&depth| self.node(depth).is_atom())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::LiquidDelim;

	fn doc() -> Node {
		// 0 <p> 1 a 2 b 3 <liquid> 4 x 5 </liquid> 6 c 7 </p> 8
		Node::doc([Node::paragraph([
			Node::text("ab"),
			Node::liquid(LiquidDelim::Tag, "x"),
			Node::text("c"),
		])])
	}

	#[test]
	fn resolve_inside_text() {
		let rp = doc().resolve(2).unwrap();
		assert_eq!(rp.depth(), 1);
		assert_eq!(rp.parent_offset(), 1);
		assert_eq!(rp.text_offset(), 1);
		assert_eq!(rp.node_before().unwrap().text_str(), Some("a"));
		assert_eq!(rp.node_after().unwrap().text_str(), Some("b"));
	}

	#[test]
	fn resolve_before_atom() {
		let rp = doc().resolve(3).unwrap();
		assert_eq!(rp.depth(), 1);
		assert_eq!(rp.text_offset(), 0);
		assert!(rp.node_after().unwrap().spec().is_atomic_inline());
		assert_eq!(rp.node_before().unwrap().text_str(), Some("ab"));
	}

	#[test]
	fn resolve_inside_atom() {
		let rp = doc().resolve(4).unwrap();
		assert_eq!(rp.depth(), 2);
		assert_eq!(rp.start(2), 4);
		assert_eq!(rp.before(2), Some(3));
		assert_eq!(rp.after(2), Some(6));
		assert_eq!(rp.atom_ancestor(), Some(2));
	}

	#[test]
	fn out_of_range() {
		assert!(matches!(doc().resolve(9), Err(PositionError::OutOfRange { pos: 9, size: 8 })));
	}
}
