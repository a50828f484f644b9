//! Error types for buffer edits.

use regionize_primitives::{AnchorId, CharIdx, LineIdx};
use thiserror::Error;

/// Errors raised by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The document rejects modifications.
	#[error("document is read-only")]
	ReadOnly,

	/// The anchor id was released or never belonged to this document.
	#[error("unknown anchor {0:?}")]
	UnknownAnchor(AnchorId),

	/// The text under the anchor was deleted.
	#[error("anchor {0:?} lost its text to a deletion")]
	DetachedAnchor(AnchorId),

	/// A char position lies past the end of the document.
	#[error("position {pos} is past the end of the document ({len} chars)")]
	OutOfBounds {
		/// Requested position.
		pos: CharIdx,
		/// Document length in chars.
		len: usize,
	},

	/// A line index lies past the last line.
	#[error("line {line} is past the end of the document ({lines} lines)")]
	LineOutOfBounds {
		/// Requested line.
		line: LineIdx,
		/// Number of lines in the document.
		lines: usize,
	},
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, EditError>;
