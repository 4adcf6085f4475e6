//! Core types for structured documents: nodes, positions, steps and selections.

/// Error types shared by the document model.
pub mod error;
/// Grapheme cluster boundary detection.
pub mod graphemes;
/// Key event types.
pub mod key;
/// Immutable document tree nodes and fragments.
pub mod node;
/// Positions resolved against a document tree.
pub mod resolved;
/// Node kinds, flags and content rules.
pub mod schema;
/// Selection types for text carets, node selections and select-all.
pub mod selection;
/// Open-ended document pieces used by replace operations.
pub mod slice;
/// Steps, step maps and transforms.
pub mod transform;

mod replace;

pub use error::{PositionError, ReplaceError, StepError};
pub use key::{Key, KeyCode, Modifiers};
pub use node::{DiffEnd, Fragment, Node};
pub use resolved::ResolvedPos;
pub use schema::{Attrs, ContentRule, LiquidDelim, NodeFlags, NodeKind, NodeSpec};
pub use selection::Selection;
pub use slice::Slice;
pub use transform::{Bias, MapResult, Mappable, Mapping, Step, StepMap, Transform};

/// An offset into a document's linear coordinate space.
///
/// Text contributes one unit per char, every non-text node contributes one
/// unit for its opening and one for its closing boundary.
pub type Pos = usize;
