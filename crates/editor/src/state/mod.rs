//! Editor state: a document, a selection and the plugins that shape edits.

use std::fmt;
use std::sync::Arc;

use tagpad_primitives::{Node, Selection};
use tracing::{trace, warn};

use crate::plugin::Plugin;
use crate::transaction::Transaction;


/// An immutable editor state.
#[derive(Clone)]
pub struct EditorState {
	doc: Node,
	selection: Selection,
	plugins: Arc<[Arc<dyn Plugin>]>,
}

/// Result of applying a transaction with plugins.
#[derive(Debug, Clone)]
pub struct Applied {
	/// The resulting state.
	pub state: EditorState,
	/// The root transaction followed by every transaction plugins appended,
	/// in application order. Empty if a plugin filtered out the root.
	pub transactions: Vec<Transaction>,
}

impl EditorState {
	/// Creates a state with the selection at the start of `doc` and no plugins.
	pub fn new(doc: Node) -> Self {
		Self::with_plugins(doc, Vec::new())
	}

	/// Creates a state with the selection at the start of `doc`.
	pub fn with_plugins(doc: Node, plugins: Vec<Arc<dyn Plugin>>) -> Self {
		let selection = Selection::at_start(&doc);
		Self {
			doc,
			selection,
			plugins: plugins.into(),
		}
	}

	/// The document.
	pub fn doc(&self) -> &Node {
		&self.doc
	}

	/// The selection.
	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// The installed plugins.
	pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
		&self.plugins
	}

	/// Starts a transaction on this state.
	pub fn tr(&self) -> Transaction {
		Transaction::new(self.doc.clone(), self.selection)
	}

	/// Applies a transaction without running plugins.
	pub fn apply(&self, tr: &Transaction) -> EditorState {
		if tr.before() != &self.doc {
			warn!(steps = tr.steps().len(), "applying transaction built for a different document");
		}
		Self {
			doc: tr.doc().clone(),
			selection: tr.selection(),
			plugins: Arc::clone(&self.plugins),
		}
	}

	fn filter(&self, tr: &Transaction, skip: Option<usize>) -> bool {
		self.plugins
			.iter()
			.enumerate()
			.filter(|(i, _)| Some(*i) != skip)
			.all(|(_, plugin)| plugin.filter_transaction(tr, self))
	}

	/// Applies a transaction, letting plugins filter it and append follow-up
	/// transactions until none has anything left to add.
	///
	/// Each plugin sees only the transactions it has not yet seen, together
	/// with the state from before those transactions.
	pub fn apply_transaction(&self, root: Transaction) -> Applied {
		if !self.filter(&root, None) {
			trace!("transaction filtered out");
			return Applied {
				state: self.clone(),
				transactions: Vec::new(),
			};
		}
		let mut state = self.apply(&root);
		let mut trs = vec![root];
		// Per plugin: state before the unseen transactions and how many it saw.
		let mut seen: Vec<(EditorState, usize)> = self.plugins.iter().map(|_| (self.clone(), 0)).collect();
		loop {
			let mut have_new = false;
			for (i, plugin) in self.plugins.iter().enumerate() {
				let (old_state, n) = &seen[i];
				if *n < trs.len()
					&& let Some(tr) = plugin.append_transaction(&trs[*n..], old_state, &state)
					&& state.filter(&tr, Some(i))
				{
					trace!(plugin = plugin.name(), steps = tr.steps().len(), "plugin appended transaction");
					state = state.apply(&tr);
					trs.push(tr);
					have_new = true;
				}
				seen[i] = (state.clone(), trs.len());
			}
			if !have_new {
				return Applied { state, transactions: trs };
			}
		}
	}
}

impl fmt::Debug for EditorState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EditorState")
			.field("doc", &self.doc)
			.field("selection", &self.selection)
			.field("plugins", &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
			.finish()
	}
}
