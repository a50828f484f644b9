//! Core types for buffer editing: char spans, change sets, and live anchors.

/// Live positions that follow edits made elsewhere in the buffer.
pub mod anchor;
/// Char span types and index aliases.
pub mod range;
/// Rope utilities and line helpers.
pub mod rope;
/// Change sets and transactions.
pub mod transaction;

pub use anchor::{AnchorId, AnchorState, AnchorTable};
pub use range::{CharIdx, CharLen, LineIdx, Span};
pub use rope::{content_line_count, is_blank_line, leading_whitespace, line_content, line_content_end};
pub use ropey::{Rope, RopeSlice};
pub use transaction::{Bias, Change, ChangeSet, Transaction};
