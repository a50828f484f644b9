//! Change sets and the transactions built from them.

mod changeset;
mod types;


pub use changeset::ChangeSet;
pub use types::{Bias, Change, Operation, Tendril};

use crate::range::{CharIdx, Span};
use crate::{Rope, RopeSlice};

/// A single atomic edit to a document.
///
/// A transaction wraps the [`ChangeSet`] produced from a list of sorted,
/// non-overlapping [`Change`]s. Applying it mutates the rope; the same
/// changeset is then used to map every live anchor of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	changes: ChangeSet,
}

impl Transaction {
	/// Builds a transaction from changes sorted by `start`.
	///
	/// Changes must not overlap and must lie within `doc`.
	pub fn change(doc: RopeSlice, changes: impl IntoIterator<Item = Change>) -> Self {
		let mut cs = ChangeSet::new(doc);
		let mut last = 0;

		for change in changes {
			debug_assert!(change.start >= last, "changes must be sorted and disjoint");
			debug_assert!(change.start <= change.end, "change start past its end");
			cs.retain(change.start - last);
			cs.delete(change.end - change.start);
			if let Some(text) = change.replacement {
				cs.insert(text);
			}
			last = change.end;
		}

		cs.finish(doc);
		Self { changes: cs }
	}

	/// Inserts `text` at `pos`.
	pub fn insert(doc: RopeSlice, pos: CharIdx, text: impl Into<String>) -> Self {
		Self::change(
			doc,
			[Change {
				start: pos,
				end: pos,
				replacement: Some(text.into()),
			}],
		)
	}

	/// Deletes the chars covered by `span`.
	pub fn delete(doc: RopeSlice, span: Span) -> Self {
		Self::change(
			doc,
			[Change {
				start: span.start,
				end: span.end,
				replacement: None,
			}],
		)
	}

	/// Applies this transaction to `doc`.
	pub fn apply(&self, doc: &mut Rope) {
		self.changes.apply(doc);
	}

	/// Maps a position through this transaction.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		self.changes.map_pos(pos, bias)
	}

	/// Returns the underlying changeset.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Consumes the transaction, returning its changeset.
	pub fn into_changes(self) -> ChangeSet {
		self.changes
	}
}
