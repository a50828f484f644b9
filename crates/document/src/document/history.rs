//! Undo history and transaction grouping.

use regionize_primitives::{AnchorTable, ChangeSet, Rope};
use tracing::trace;

use super::Document;
use crate::error::EditError;

/// Maximum undo history size.
pub(super) const MAX_UNDO: usize = 100;

/// Snapshot of document text for undo operations.
///
/// Versions are not part of a snapshot: undo and redo advance the version like
/// any other edit.
#[derive(Debug, Clone)]
pub(super) struct HistoryEntry {
	/// Document text content.
	pub(super) rope: Rope,
}

/// State captured when a transaction opens.
pub(super) struct OpenGroup {
	/// Text to restore on rollback and to record for undo.
	before: HistoryEntry,
	/// Anchor positions to restore on rollback.
	anchors: AnchorTable,
	/// All changes applied so far, composed into one.
	changes: Option<ChangeSet>,
}

impl OpenGroup {
	pub(super) fn record(&mut self, changes: ChangeSet) {
		self.changes = Some(match self.changes.take() {
			Some(acc) => acc.compose(changes),
			None => changes,
		});
	}
}

/// Outcome of a committed [`Document::transact`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
	/// Version before the transaction.
	pub version_before: u64,
	/// Version after the transaction.
	pub version_after: u64,
	/// Every edit of the transaction composed into one changeset, if any.
	pub changes: Option<ChangeSet>,
	/// Whether an undo step was recorded.
	pub undo_recorded: bool,
}

impl CommitResult {
	fn unchanged(version: u64) -> Self {
		Self {
			version_before: version,
			version_after: version,
			changes: None,
			undo_recorded: false,
		}
	}

	/// Returns true if the transaction changed the text.
	pub fn is_changed(&self) -> bool {
		self.changes.is_some()
	}
}

impl Document {
	/// Runs `f` as one all-or-nothing edit group.
	///
	/// If `f` fails, the text and every anchor are restored to their state
	/// before the call and the error is returned. On success one undo step is
	/// recorded for the whole group and the version advances once.
	///
	/// A call made while another transaction is open joins it; only the
	/// outermost call commits or rolls back.
	pub fn transact<T, E>(
		&mut self,
		f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
	) -> std::result::Result<(T, CommitResult), E>
	where
		E: From<EditError>,
	{
		if self.group.is_some() {
			let value = f(self)?;
			return Ok((value, CommitResult::unchanged(self.version)));
		}

		self.ensure_writable()?;
		self.group = Some(OpenGroup {
			before: HistoryEntry {
				rope: self.content.clone(),
			},
			anchors: self.anchors.clone(),
			changes: None,
		});

		let outcome = f(self);
		let Some(group) = self.group.take() else {
			return outcome.map(|value| (value, CommitResult::unchanged(self.version)));
		};

		match outcome {
			Ok(value) => Ok((value, self.close_group(group))),
			Err(err) => {
				trace!(version = self.version, "transaction rolled back");
				self.content = group.before.rope;
				self.anchors = group.anchors;
				Err(err)
			}
		}
	}

	fn close_group(&mut self, group: OpenGroup) -> CommitResult {
		let Some(changes) = group.changes else {
			return CommitResult::unchanged(self.version);
		};

		let version_before = self.version;
		self.push_undo_entry(group.before);
		self.modified = true;
		self.version = self.version.wrapping_add(1);
		trace!(
			version_before,
			version_after = self.version,
			len_before = changes.len(),
			len_after = changes.len_after(),
			"transaction committed"
		);

		CommitResult {
			version_before,
			version_after: self.version,
			changes: Some(changes),
			undo_recorded: true,
		}
	}

	/// Returns true while a transaction is collecting edits.
	pub fn in_transaction(&self) -> bool {
		self.group.is_some()
	}

	/// Undoes the last edit group.
	///
	/// Returns `true` if undo was successful, `false` if nothing to undo.
	/// Anchors cannot be carried across a snapshot swap and are detached.
	pub fn undo(&mut self) -> bool {
		let Some(entry) = self.undo_stack.pop() else {
			trace!("undo: nothing to undo");
			return false;
		};
		self.redo_stack.push(HistoryEntry {
			rope: self.content.clone(),
		});
		self.content = entry.rope;
		self.version = self.version.wrapping_add(1);
		self.anchors.detach_all();
		true
	}

	/// Redoes the last undone edit group.
	///
	/// Returns `true` if redo was successful, `false` if nothing to redo.
	pub fn redo(&mut self) -> bool {
		let Some(entry) = self.redo_stack.pop() else {
			trace!("redo: nothing to redo");
			return false;
		};
		self.undo_stack.push(HistoryEntry {
			rope: self.content.clone(),
		});
		self.content = entry.rope;
		self.version = self.version.wrapping_add(1);
		self.anchors.detach_all();
		true
	}

	/// Returns the number of items in the undo stack.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Returns whether undo is available.
	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	pub(super) fn push_undo_entry(&mut self, entry: HistoryEntry) {
		self.undo_stack.push(entry);
		if !self.redo_stack.is_empty() {
			trace!(cleared = self.redo_stack.len(), "redo stack cleared");
		}
		self.redo_stack.clear();

		if self.undo_stack.len() > MAX_UNDO {
			self.undo_stack.remove(0);
		}
	}
}
