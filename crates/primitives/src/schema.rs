//! The fixed document schema.
//!
//! Node kinds form a closed set known at compile time. Each kind has a
//! [`NodeSpec`] descriptor carrying capability flags and a content rule, so
//! callers check capabilities (for example [`NodeSpec::is_atomic_inline`])
//! instead of inferring them from combinations of other properties.

use std::collections::BTreeMap;

use bitflags::bitflags;

bitflags! {
	/// Capabilities declared by a node kind.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct NodeFlags: u8 {
		/// Participates in block layout.
		const BLOCK = 1 << 0;
		/// Flows inside a textblock.
		const INLINE = 1 << 1;
		/// A text leaf.
		const TEXT = 1 << 2;
		/// A block whose content is inline.
		const TEXTBLOCK = 1 << 3;
		/// Not entered by normal caret movement; selected as a unit.
		const ATOM = 1 << 4;
	}
}

/// What a node kind may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRule {
	/// Block nodes only.
	Blocks,
	/// Inline nodes (text and inline atoms).
	Inline,
	/// Plain text only.
	Text,
	/// No content at all.
	Leaf,
}

/// Static descriptor of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
	/// Schema name, used in errors and debug output.
	pub name: &'static str,
	/// Declared capabilities.
	pub flags: NodeFlags,
	/// Allowed content.
	pub content: ContentRule,
}

impl NodeSpec {
	/// Returns true for inline nodes that are selected and traversed as a unit.
	pub fn is_atomic_inline(&self) -> bool {
		self.flags.contains(NodeFlags::INLINE | NodeFlags::ATOM) && !self.flags.contains(NodeFlags::TEXT)
	}

	/// Returns true if the content rule admits `child`.
	pub fn allows(&self, child: NodeKind) -> bool {
		let flags = child.spec().flags;
		match self.content {
			ContentRule::Blocks => flags.contains(NodeFlags::BLOCK),
			ContentRule::Inline => flags.contains(NodeFlags::INLINE),
			ContentRule::Text => flags.contains(NodeFlags::TEXT),
			ContentRule::Leaf => false,
		}
	}
}

/// The node kinds of the document schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
	/// Document root.
	Doc,
	/// Paragraph of inline content.
	Paragraph,
	/// Text leaf.
	Text,
	/// Liquid template tag: an inline atom holding plain text.
	Liquid,
}

const DOC: NodeSpec = NodeSpec {
	name: "doc",
	flags: NodeFlags::empty(),
	content: ContentRule::Blocks,
};

const PARAGRAPH: NodeSpec = NodeSpec {
	name: "paragraph",
	flags: NodeFlags::BLOCK.union(NodeFlags::TEXTBLOCK),
	content: ContentRule::Inline,
};

const TEXT: NodeSpec = NodeSpec {
	name: "text",
	flags: NodeFlags::INLINE.union(NodeFlags::TEXT),
	content: ContentRule::Leaf,
};

const LIQUID: NodeSpec = NodeSpec {
	name: "liquid",
	flags: NodeFlags::INLINE.union(NodeFlags::ATOM),
	content: ContentRule::Text,
};

impl NodeKind {
	/// Every kind in the schema.
	pub const ALL: [NodeKind; 4] = [NodeKind::Doc, NodeKind::Paragraph, NodeKind::Text, NodeKind::Liquid];

	/// Returns the descriptor for this kind.
	pub const fn spec(self) -> &'static NodeSpec {
		match self {
			NodeKind::Doc => &DOC,
			NodeKind::Paragraph => &PARAGRAPH,
			NodeKind::Text => &TEXT,
			NodeKind::Liquid => &LIQUID,
		}
	}

	/// Returns the schema name.
	pub const fn name(self) -> &'static str {
		self.spec().name
	}

	/// Default attributes for freshly created nodes of this kind.
	pub fn default_attrs(self) -> Attrs {
		match self {
			NodeKind::Liquid => Attrs::new().with(LiquidDelim::ATTR, LiquidDelim::Tag.as_str()),
			_ => Attrs::new(),
		}
	}
}

/// Node attributes, compared as part of a node's markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Attrs(BTreeMap<String, String>);

impl Attrs {
	/// Creates an empty attribute set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy with `key` set to `value`.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	/// Looks up an attribute.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns true if no attributes are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates attributes in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// Delimiter style of a liquid node, stored in its `delim` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiquidDelim {
	/// `{% … %}` logic tag.
	#[default]
	Tag,
	/// `{{ … }}` output tag.
	Output,
}

impl LiquidDelim {
	/// Attribute key holding the delimiter.
	pub const ATTR: &'static str = "delim";

	/// Attribute value for this delimiter.
	pub const fn as_str(self) -> &'static str {
		match self {
			LiquidDelim::Tag => "tag",
			LiquidDelim::Output => "output",
		}
	}

	/// Reads the delimiter from node attributes, defaulting to [`LiquidDelim::Tag`].
	pub fn from_attrs(attrs: &Attrs) -> Self {
		match attrs.get(Self::ATTR) {
			Some("output") => LiquidDelim::Output,
			_ => LiquidDelim::Tag,
		}
	}

	/// Attribute set selecting this delimiter.
	pub fn attrs(self) -> Attrs {
		Attrs::new().with(Self::ATTR, self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn liquid_is_the_only_atomic_inline_kind() {
		let atomic: Vec<_> = NodeKind::ALL.into_iter().filter(|k| k.spec().is_atomic_inline()).collect();
		assert_eq!(atomic, vec![NodeKind::Liquid]);
	}

	#[test]
	fn content_rules() {
		assert!(NodeKind::Doc.spec().allows(NodeKind::Paragraph));
		assert!(!NodeKind::Doc.spec().allows(NodeKind::Text));
		assert!(NodeKind::Paragraph.spec().allows(NodeKind::Liquid));
		assert!(NodeKind::Liquid.spec().allows(NodeKind::Text));
		assert!(!NodeKind::Liquid.spec().allows(NodeKind::Liquid));
		assert!(!NodeKind::Text.spec().allows(NodeKind::Text));
	}

	#[test]
	fn delimiter_defaults_to_tag() {
		assert_eq!(LiquidDelim::from_attrs(&Attrs::new()), LiquidDelim::Tag);
		assert_eq!(LiquidDelim::from_attrs(&LiquidDelim::Output.attrs()), LiquidDelim::Output);
		assert_eq!(NodeKind::Liquid.default_attrs(), LiquidDelim::Tag.attrs());
	}
}
