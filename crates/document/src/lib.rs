//! The mutable text buffer the layout engines operate on.
//!
//! A [`Document`] owns the rope, the live anchor table, and the undo history.
//! All edits go through it so every outstanding anchor is remapped in the
//! order the edits are issued.

mod document;
mod error;

pub use document::{CommitResult, Document};
pub use error::{EditError, Result};
pub use regionize_primitives::{AnchorId, AnchorState, Bias, CharIdx, LineIdx, Span};
