use thiserror::Error;

use crate::Pos;

/// A position that does not exist in the document it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
	/// Position is past the end of the content.
	#[error("position {pos} out of range (content size {size})")]
	OutOfRange {
		/// Requested position.
		pos: Pos,
		/// Size of the content it was resolved against.
		size: usize,
	},
}

/// Failure to splice a slice into a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplaceError {
	/// The slice is open deeper than the insertion point.
	#[error("inserted content deeper than insertion position")]
	TooDeep,
	/// Open depths of the slice do not line up with the replaced range.
	#[error("inconsistent open depths")]
	InconsistentOpenDepths,
	/// Two nodes with incompatible content would have to be joined.
	#[error("cannot join {sub} onto {main}")]
	CannotJoin {
		/// Node the content is joined onto.
		main: &'static str,
		/// Node whose content is being joined.
		sub: &'static str,
	},
	/// Resulting node content violates the node's content rule.
	#[error("invalid content for node {0}")]
	InvalidContent(&'static str),
	/// One of the positions does not exist.
	#[error(transparent)]
	Position(#[from] PositionError),
}

/// Failure to apply a step to a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
	/// The replace underlying the step failed.
	#[error(transparent)]
	Replace(#[from] ReplaceError),
	/// A position used by the step does not exist.
	#[error(transparent)]
	Position(#[from] PositionError),
	/// No node starts at the attribute step's position.
	#[error("no node at position {0}")]
	NoNodeAt(Pos),
	/// Text nodes carry no attributes.
	#[error("cannot set attributes on text at position {0}")]
	TextAttrs(Pos),
}
