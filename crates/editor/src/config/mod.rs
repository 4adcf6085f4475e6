//! Editor configuration.
//!
//! Configuration is written in TOML. Every section and field is optional:
//!
//! ```toml
//! [liquid]
//! single_line = true
//!
//! [liquid.tag]
//! open = "{%"
//! close = "%}"
//!
//! [liquid.output]
//! open = "{{"
//! close = "}}"
//!
//! [history]
//! depth = 100
//!
//! [keys]
//! undo = ["ctrl-z"]
//! redo = ["ctrl-y", "shift-ctrl-z"]
//! ```


use std::path::{Path, PathBuf};

use serde::Deserialize;
use tagpad_primitives::LiquidDelim;
use thiserror::Error;

use crate::history::{HistoryAction, MAX_UNDO};
use crate::keymap::{Keymap, KeymapError, parse_key};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A key binding could not be parsed.
	#[error("invalid binding {binding:?}: {error}")]
	Binding {
		/// The binding text.
		binding: String,
		/// The parse failure.
		error: KeymapError,
	},

	/// A marker pair has an empty side.
	#[error("empty {0} marker")]
	EmptyMarker(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Decorative text drawn around a liquid node's content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Markers {
	/// Drawn before the content.
	pub open: String,
	/// Drawn after the content.
	pub close: String,
}

impl Markers {
	fn new(open: &str, close: &str) -> Self {
		Self {
			open: open.to_owned(),
			close: close.to_owned(),
		}
	}
}

/// Liquid node presentation and editing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiquidConfig {
	/// Markers for `{% … %}` logic tags.
	pub tag: Markers,
	/// Markers for `{{ … }}` output tags.
	pub output: Markers,
	/// Whether inner editors replace typed newlines with spaces.
	pub single_line: bool,
}

impl Default for LiquidConfig {
	fn default() -> Self {
		Self {
			tag: Markers::new("{%", "%}"),
			output: Markers::new("{{", "}}"),
			single_line: true,
		}
	}
}

impl LiquidConfig {
	/// Markers for a delimiter style.
	pub fn markers(&self, delim: LiquidDelim) -> &Markers {
		match delim {
			LiquidDelim::Tag => &self.tag,
			LiquidDelim::Output => &self.output,
		}
	}
}

/// Undo history options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
	/// Maximum number of undo entries kept.
	pub depth: usize,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self { depth: MAX_UNDO }
	}
}

/// Bindings for history commands, shared by the outer editor and every
/// nested editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
	/// Bindings that undo.
	pub undo: Vec<String>,
	/// Bindings that redo.
	pub redo: Vec<String>,
}

impl Default for KeysConfig {
	fn default() -> Self {
		Self {
			undo: vec!["ctrl-z".into()],
			redo: vec!["ctrl-y".into(), "shift-ctrl-z".into()],
		}
	}
}

impl KeysConfig {
	/// Builds a keymap from the configured history bindings.
	pub fn history_keymap(&self) -> std::result::Result<Keymap<HistoryAction>, KeymapError> {
		let mut keymap = Keymap::new();
		keymap
			.bind_all(&self.undo, HistoryAction::Undo)?
			.bind_all(&self.redo, HistoryAction::Redo)?;
		Ok(keymap)
	}
}

/// Parsed editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
	/// Liquid node options.
	pub liquid: LiquidConfig,
	/// Undo history options.
	pub history: HistoryConfig,
	/// History key bindings.
	pub keys: KeysConfig,
}

impl EditorConfig {
	/// Parses and validates a TOML string.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: EditorConfig = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::from_toml_str(&content)
	}

	fn validate(&self) -> Result<()> {
		for binding in self.keys.undo.iter().chain(&self.keys.redo) {
			parse_key(binding).map_err(|error| ConfigError::Binding {
				binding: binding.clone(),
				error,
			})?;
		}
		for (name, markers) in [("tag", &self.liquid.tag), ("output", &self.liquid.output)] {
			if markers.open.is_empty() || markers.close.is_empty() {
				return Err(ConfigError::EmptyMarker(name));
			}
		}
		Ok(())
	}
}
