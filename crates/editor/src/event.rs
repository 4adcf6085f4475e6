//! Input events routed to views.

use tagpad_primitives::{Key, Pos};

use crate::view::ViewId;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
	/// A key press.
	Key(Key),
	/// Text input, possibly several chars from an input method.
	Text(String),
	/// A pointer press, with the position it hit inside the target view's
	/// document when known.
	Pointer {
		/// Hit position in the target's document.
		pos: Option<Pos>,
	},
}

/// An input event and the view it originated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
	/// View the event targets.
	pub target: ViewId,
	/// The input.
	pub kind: InputKind,
}

impl InputEvent {
	/// A key press in `target`.
	pub fn key(target: ViewId, key: Key) -> Self {
		Self {
			target,
			kind: InputKind::Key(key),
		}
	}

	/// Text typed into `target`.
	pub fn text(target: ViewId, text: impl Into<String>) -> Self {
		Self {
			target,
			kind: InputKind::Text(text.into()),
		}
	}

	/// A pointer press in `target`.
	pub fn pointer(target: ViewId, pos: Option<Pos>) -> Self {
		Self {
			target,
			kind: InputKind::Pointer { pos },
		}
	}
}
