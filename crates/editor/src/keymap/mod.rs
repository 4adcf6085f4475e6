//! Keymaps: binding notation parser and key-to-action lookup.
//!
//! Bindings are written as modifiers followed by a key, joined by `-`:
//!
//! ```text
//! binding   = modifiers* key
//! modifiers = modifier "-"
//! modifier  = "ctrl" | "alt" | "shift"
//! key       = named-key | char
//! named-key = "left" | "right" | "up" | "down" | "backspace" | "del" | ...
//! char      = any single char
//! ```

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;
use tagpad_primitives::{Key, KeyCode, Modifiers};
use thiserror::Error;

/// Failure to parse a binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
	/// The binding text does not match the grammar.
	#[error("parse error at position {position}: {message}")]
	Parse {
		/// Human-readable description.
		message: String,
		/// Byte offset in the input where the error occurred.
		position: usize,
	},
}

const KEY_SEP: char = '-';

/// Recursive descent state over the binding text.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Runs `f`, restoring the parser if it does not produce a value.
	fn try_parse<T>(&mut self, f: impl FnOnce(&mut Parser<'a>) -> Option<T>) -> Option<T> {
		let snapshot = (self.input, self.position);
		let result = f(self);
		if result.is_none() {
			(self.input, self.position) = snapshot;
		}
		result
	}

	fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
		let len = self.input.find(|ch: char| !predicate(ch)).unwrap_or(self.input.len());
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}

	fn error(&self, message: impl Into<String>) -> KeymapError {
		KeymapError::Parse {
			message: message.into(),
			position: self.position,
		}
	}
}

/// Parses a single binding such as `"ctrl-z"` or `"shift-ctrl-z"`.
pub fn parse_key(s: &str) -> Result<Key, KeymapError> {
	let mut parser = Parser::new(s);
	let mut modifiers = Modifiers::NONE;
	while let Some(modifier) = parser.try_parse(parse_modifier) {
		match modifier {
			"ctrl" => modifiers.ctrl = true,
			"alt" => modifiers.alt = true,
			_ => modifiers.shift = true,
		}
	}
	let code = parser
		.try_parse(parse_named_key)
		.or_else(|| parser.next().map(KeyCode::Char))
		.ok_or_else(|| parser.error("expected a key"))?;
	if !parser.is_end() {
		return Err(parser.error(format!("expected end of input, found: {}", parser.input)));
	}
	Ok(Key { code, modifiers })
}

fn parse_modifier<'a>(p: &mut Parser<'a>) -> Option<&'a str> {
	let name = p.take_while(|ch| ch.is_ascii_alphabetic());
	let modifier = match name {
		"ctrl" | "alt" | "shift" => name,
		_ => return None,
	};
	(p.next() == Some(KEY_SEP)).then_some(modifier)
}

fn parse_named_key(p: &mut Parser<'_>) -> Option<KeyCode> {
	let name = p.take_while(|ch| ch.is_ascii_alphabetic());
	Some(match name {
		"left" => KeyCode::Left,
		"right" => KeyCode::Right,
		"up" => KeyCode::Up,
		"down" => KeyCode::Down,
		"backspace" => KeyCode::Backspace,
		"del" | "delete" => KeyCode::Delete,
		"ret" | "enter" => KeyCode::Enter,
		"esc" => KeyCode::Esc,
		"tab" => KeyCode::Tab,
		"home" => KeyCode::Home,
		"end" => KeyCode::End,
		"space" => KeyCode::Char(' '),
		_ => return None,
	})
}

/// Key-to-action bindings.
#[derive(Debug, Clone)]
pub struct Keymap<A> {
	bindings: FxHashMap<Key, A>,
}

impl<A> Default for Keymap<A> {
	fn default() -> Self {
		Self {
			bindings: FxHashMap::default(),
		}
	}
}

impl<A> Keymap<A> {
	/// Creates an empty keymap.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds a parsed key, replacing any previous binding.
	pub fn bind_key(&mut self, key: Key, action: A) -> &mut Self {
		self.bindings.insert(key, action);
		self
	}

	/// Parses `binding` and binds it.
	pub fn bind(&mut self, binding: &str, action: A) -> Result<&mut Self, KeymapError> {
		let key = parse_key(binding)?;
		Ok(self.bind_key(key, action))
	}

	/// Looks up the action bound to `key`.
	pub fn get(&self, key: &Key) -> Option<&A> {
		self.bindings.get(key)
	}

	/// Number of bindings.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Returns true if nothing is bound.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

impl<A: Clone> Keymap<A> {
	/// Parses every binding in `bindings` and binds each to `action`.
	pub fn bind_all<S: AsRef<str>>(&mut self, bindings: &[S], action: A) -> Result<&mut Self, KeymapError> {
		for binding in bindings {
			self.bind(binding.as_ref(), action.clone())?;
		}
		Ok(self)
	}
}
