//! Editing framework: transactions, state, history, commands, keymaps and views.
//!
//! States are immutable. A [`Transaction`] built from a state is applied to
//! produce the next state, with [`Plugin`]s able to filter it or append
//! follow-up transactions. [`EditorView`] owns a state and tracks focus
//! through a [`FocusHandle`] shared by every view of a session.

pub mod commands;
pub mod config;
pub mod event;
pub mod history;
pub mod keymap;
pub mod plugin;
pub mod state;
pub mod transaction;
pub mod view;

pub use config::{ConfigError, EditorConfig};
pub use event::{InputEvent, InputKind};
pub use history::{History, HistoryAction};
pub use keymap::{Keymap, KeymapError};
pub use plugin::{Plugin, SingleLine};
pub use state::{Applied, EditorState};
pub use transaction::{Transaction, TxFlags};
pub use view::{EditorView, FocusHandle, ViewId};
