//! State plugins.

#[cfg(test)]
mod tests;

use tagpad_primitives::Node;

use crate::state::EditorState;
use crate::transaction::Transaction;

/// Hooks run by [`EditorState::apply_transaction`].
pub trait Plugin {
	/// Name used in logs.
	fn name(&self) -> &'static str;

	/// Returns false to drop `tr` before it is applied.
	fn filter_transaction(&self, _tr: &Transaction, _state: &EditorState) -> bool {
		true
	}

	/// Returns a transaction to apply after `trs`, which took `old_state` to
	/// `new_state`.
	fn append_transaction(
		&self,
		_trs: &[Transaction],
		_old_state: &EditorState,
		_new_state: &EditorState,
	) -> Option<Transaction> {
		None
	}
}

/// Keeps a document on one line by replacing every newline with a space.
///
/// Transactions tagged as coming from outside are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLine;

impl Plugin for SingleLine {
	fn name(&self) -> &'static str {
		"single-line"
	}

	fn append_transaction(&self, trs: &[Transaction], _old: &EditorState, new: &EditorState) -> Option<Transaction> {
		// Content mirrored from elsewhere is kept exactly as it arrived.
		if !trs.iter().any(Transaction::doc_changed) || trs.iter().any(Transaction::is_from_outside) {
			return None;
		}
		let breaks = newline_positions(new.doc());
		if breaks.is_empty() {
			return None;
		}
		let mut tr = new.tr();
		// Same-length replacements leave later positions in place.
		for pos in breaks {
			if tr.insert_text(" ", pos, pos + 1).is_err() {
				return None;
			}
		}
		Some(tr)
	}
}

fn newline_positions(doc: &Node) -> Vec<usize> {
	let mut out = Vec::new();
	doc.descendants(|node, pos| {
		if let Some(text) = node.text_str() {
			out.extend(text.chars().enumerate().filter(|(_, c)| *c == '\n').map(|(i, _)| pos + i));
		}
		true
	});
	out
}
