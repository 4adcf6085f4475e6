//! Key representation for editor bindings.
//!
//! A [`Key`] is a [`KeyCode`] plus [`Modifiers`]. Keys print in the same
//! `ctrl-shift-z` notation the keymap parser reads.

use std::fmt;

/// Key modifiers (Ctrl, Alt, Shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	/// Whether Ctrl is held.
	pub ctrl: bool,
	/// Whether Alt is held.
	pub alt: bool,
	/// Whether Shift is held.
	pub shift: bool,
}

impl Modifiers {
	/// No modifiers pressed.
	pub const NONE: Self = Self {
		ctrl: false,
		alt: false,
		shift: false,
	};

	/// Only Ctrl pressed.
	pub const CTRL: Self = Self {
		ctrl: true,
		alt: false,
		shift: false,
	};

	/// Only Shift pressed.
	pub const SHIFT: Self = Self {
		ctrl: false,
		alt: false,
		shift: true,
	};

	/// Returns true if no modifiers are set.
	pub fn is_empty(self) -> bool {
		!self.ctrl && !self.alt && !self.shift
	}
}

/// Physical key without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	/// A printable character.
	Char(char),
	/// Left arrow.
	Left,
	/// Right arrow.
	Right,
	/// Up arrow.
	Up,
	/// Down arrow.
	Down,
	/// Backspace.
	Backspace,
	/// Forward delete.
	Delete,
	/// Enter / return.
	Enter,
	/// Escape.
	Esc,
	/// Tab.
	Tab,
	/// Home.
	Home,
	/// End.
	End,
}

impl KeyCode {
	/// Name used in binding notation.
	pub fn name(self) -> Option<&'static str> {
		Some(match self {
			KeyCode::Char(_) => return None,
			KeyCode::Left => "left",
			KeyCode::Right => "right",
			KeyCode::Up => "up",
			KeyCode::Down => "down",
			KeyCode::Backspace => "backspace",
			KeyCode::Delete => "del",
			KeyCode::Enter => "ret",
			KeyCode::Esc => "esc",
			KeyCode::Tab => "tab",
			KeyCode::Home => "home",
			KeyCode::End => "end",
		})
	}
}

/// A key with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
	/// The key pressed.
	pub code: KeyCode,
	/// Modifiers held.
	pub modifiers: Modifiers,
}

impl Key {
	/// Create a key from a key code with no modifiers.
	pub const fn new(code: KeyCode) -> Self {
		Self {
			code,
			modifiers: Modifiers::NONE,
		}
	}

	/// Create a key from a character with no modifiers.
	pub const fn char(c: char) -> Self {
		Self::new(KeyCode::Char(c))
	}

	/// Create a key with Ctrl modifier.
	pub const fn ctrl(c: char) -> Self {
		Self {
			code: KeyCode::Char(c),
			modifiers: Modifiers::CTRL,
		}
	}

	/// Add Shift modifier.
	pub const fn with_shift(self) -> Self {
		Self {
			modifiers: Modifiers {
				shift: true,
				..self.modifiers
			},
			..self
		}
	}

	/// Add Ctrl modifier.
	pub const fn with_ctrl(self) -> Self {
		Self {
			modifiers: Modifiers {
				ctrl: true,
				..self.modifiers
			},
			..self
		}
	}

	/// Check if this key is `code` with no modifiers held.
	pub fn is_plain(&self, code: KeyCode) -> bool {
		self.code == code && self.modifiers.is_empty()
	}

	/// Text this key inserts when typed, if any.
	pub fn codepoint(&self) -> Option<char> {
		match self.code {
			KeyCode::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
			_ => None,
		}
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.modifiers.shift {
			f.write_str("shift-")?;
		}
		if self.modifiers.ctrl {
			f.write_str("ctrl-")?;
		}
		if self.modifiers.alt {
			f.write_str("alt-")?;
		}
		match self.code {
			KeyCode::Char(' ') => f.write_str("space"),
			KeyCode::Char(c) => write!(f, "{c}"),
			code => f.write_str(code.name().unwrap_or_default()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_uses_binding_notation() {
		assert_eq!(Key::ctrl('z').to_string(), "ctrl-z");
		assert_eq!(Key::ctrl('z').with_shift().to_string(), "shift-ctrl-z");
		assert_eq!(Key::new(KeyCode::Delete).to_string(), "del");
		assert_eq!(Key::char(' ').to_string(), "space");
	}

	#[test]
	fn ctrl_keys_insert_nothing() {
		assert_eq!(Key::char('a').codepoint(), Some('a'));
		assert_eq!(Key::ctrl('a').codepoint(), None);
		assert!(Key::new(KeyCode::Left).is_plain(KeyCode::Left));
		assert!(!Key::new(KeyCode::Left).with_shift().is_plain(KeyCode::Left));
	}
}
