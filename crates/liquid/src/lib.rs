//! Liquid template nodes for the tagpad editor.
//!
//! A liquid node is an atomic inline node in the outer document. Its text is
//! edited through a nested editor that owns a sub-document of its own and
//! keeps it in sync with the node in both directions. The outer editor gets
//! keyboard bindings that step the caret into an adjacent liquid node instead
//! of jumping over it.

/// Nested editor for one liquid node.
pub mod controller;
/// Caret movement into adjacent liquid nodes.
pub mod navigation;
/// The outer editor seen from a nested editor.
pub mod outer;
/// Node view trait, factories and the live view set.
pub mod registry;
/// Outer editor, node views and input routing in one place.
pub mod session;

pub use controller::{LiquidController, SyncRange, sync_range};
pub use navigation::boundary_keymap;
pub use outer::{GetPos, OuterEditor};
pub use registry::{NodeView, NodeViewContext, NodeViewFactory, NodeViewRegistry, NodeViews};
pub use session::{OuterSurface, Session};
