//! Slices: pieces of a document that may be open on either side.

use crate::node::Fragment;

/// A fragment cut out of a document, possibly open at its ends.
///
/// `open_start` and `open_end` count how many levels of the fragment's first
/// and last nodes are open, i.e. continue content of the surrounding nodes
/// rather than standing as whole nodes of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slice {
	content: Fragment,
	open_start: usize,
	open_end: usize,
}

impl Slice {
	/// Creates a slice.
	pub fn new(content: Fragment, open_start: usize, open_end: usize) -> Self {
		Self {
			content,
			open_start,
			open_end,
		}
	}

	/// The empty, closed slice.
	pub fn empty() -> Self {
		Self::default()
	}

	/// A closed slice over whole nodes.
	pub fn closed(content: Fragment) -> Self {
		Self::new(content, 0, 0)
	}

	/// The slice's content.
	pub fn content(&self) -> &Fragment {
		&self.content
	}

	/// Open depth at the start.
	pub fn open_start(&self) -> usize {
		self.open_start
	}

	/// Open depth at the end.
	pub fn open_end(&self) -> usize {
		self.open_end
	}

	/// Size the slice adds when inserted.
	pub fn size(&self) -> usize {
		self.content.size().saturating_sub(self.open_start + self.open_end)
	}

	/// Returns true if inserting the slice adds nothing.
	pub fn is_empty(&self) -> bool {
		self.size() == 0
	}
}
