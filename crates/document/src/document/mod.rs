//! Document - the single mutable buffer of a layout pass.
//!
//! A [`Document`] holds the text, the [`AnchorTable`] of live positions into
//! it, and a snapshot-based undo history. Every mutation is expressed as a
//! [`Transaction`]; after the rope is updated, the same changeset remaps all
//! anchors, so callers never recompute offsets after an edit.
//!
//! # Transactions
//!
//! [`Document::transact`] groups edits into one undo step and rolls the
//! buffer (and its anchors) back if the closure fails. Edits issued outside a
//! transaction each form their own undo step.

mod edit;
mod history;


use regionize_primitives::{
	AnchorId, AnchorState, AnchorTable, Bias, CharIdx, LineIdx, Rope, Span, Transaction,
	content_line_count, is_blank_line, leading_whitespace, line_content, line_content_end,
};

pub use self::history::CommitResult;
use self::history::{HistoryEntry, OpenGroup};
use crate::error::{EditError, Result};

/// An editable text buffer with live anchors.
pub struct Document {
	/// The text content.
	content: Rope,

	/// Live positions into `content`.
	anchors: AnchorTable,

	/// Whether the document has been edited since creation.
	modified: bool,

	/// Whether the document rejects all modifications.
	readonly: bool,

	/// Document version, incremented once per committed edit group.
	version: u64,

	/// Undo history stack.
	undo_stack: Vec<HistoryEntry>,

	/// Redo history stack.
	redo_stack: Vec<HistoryEntry>,

	/// The transaction currently collecting edits, if any.
	group: Option<OpenGroup>,
}

impl Document {
	/// Creates a document holding `text`.
	pub fn new(text: &str) -> Self {
		Self {
			content: Rope::from(text),
			anchors: AnchorTable::new(),
			modified: false,
			readonly: false,
			version: 0,
			undo_stack: Vec::new(),
			redo_stack: Vec::new(),
			group: None,
		}
	}

	/// Returns a reference to the document's text content.
	pub fn content(&self) -> &Rope {
		&self.content
	}

	/// Returns the whole text as a string.
	pub fn text(&self) -> String {
		self.content.to_string()
	}

	/// Returns the document length in chars.
	pub fn len_chars(&self) -> usize {
		self.content.len_chars()
	}

	/// Returns whether the document has unsaved changes.
	pub fn is_modified(&self) -> bool {
		self.modified
	}

	/// Returns whether the document is read-only.
	pub fn is_readonly(&self) -> bool {
		self.readonly
	}

	/// Sets the read-only flag.
	pub fn set_readonly(&mut self, readonly: bool) {
		self.readonly = readonly;
	}

	/// Returns the document version.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the anchor table, for inspection.
	pub fn anchors(&self) -> &AnchorTable {
		&self.anchors
	}

	/// Creates a live anchor at `pos`.
	pub fn create_anchor(&mut self, pos: CharIdx, bias: Bias) -> Result<AnchorId> {
		self.check_pos(pos)?;
		Ok(self.anchors.create(pos, bias))
	}

	/// Creates a live anchor at the start of `line`.
	pub fn anchor_at_line_start(&mut self, line: LineIdx, bias: Bias) -> Result<AnchorId> {
		let pos = self.line_start(line)?;
		Ok(self.anchors.create(pos, bias))
	}

	/// Drops an anchor. Releasing an unknown id is a no-op.
	pub fn release(&mut self, id: AnchorId) {
		self.anchors.release(id);
	}

	/// Returns the state of an anchor, or [`None`] if the id is unknown.
	pub fn anchor_state(&self, id: AnchorId) -> Option<AnchorState> {
		self.anchors.state(id)
	}

	/// Returns the current position of a live anchor.
	pub fn pos(&self, id: AnchorId) -> Result<CharIdx> {
		match self.anchors.state(id) {
			Some(AnchorState::Live(pos)) => Ok(pos),
			Some(AnchorState::Detached) => Err(EditError::DetachedAnchor(id)),
			None => Err(EditError::UnknownAnchor(id)),
		}
	}

	/// Returns the line a live anchor sits on.
	pub fn line_of(&self, id: AnchorId) -> Result<LineIdx> {
		Ok(self.content.char_to_line(self.pos(id)?))
	}

	/// Returns the column (chars from line start) of a live anchor.
	pub fn column_of(&self, id: AnchorId) -> Result<usize> {
		let pos = self.pos(id)?;
		let line = self.content.char_to_line(pos);
		Ok(pos - self.content.line_to_char(line))
	}

	/// Number of lines, including the empty line after a trailing newline.
	pub fn len_lines(&self) -> usize {
		self.content.len_lines()
	}

	/// Number of lines that can hold content.
	pub fn content_line_count(&self) -> usize {
		content_line_count(self.content.slice(..))
	}

	/// Returns the text of `line` without its line break.
	pub fn line_text(&self, line: LineIdx) -> Result<String> {
		self.check_line(line)?;
		Ok(line_content(self.content.slice(..), line))
	}

	/// Returns true if `line` holds only whitespace.
	pub fn is_blank_line(&self, line: LineIdx) -> Result<bool> {
		self.check_line(line)?;
		Ok(is_blank_line(self.content.slice(..), line))
	}

	/// Returns the leading horizontal whitespace of `line`.
	pub fn leading_whitespace(&self, line: LineIdx) -> Result<String> {
		self.check_line(line)?;
		Ok(leading_whitespace(self.content.slice(..), line))
	}

	/// Returns the char index where `line` starts.
	pub fn line_start(&self, line: LineIdx) -> Result<CharIdx> {
		self.check_line(line)?;
		Ok(self.content.line_to_char(line))
	}

	/// Returns the char index just past the content of `line`.
	pub fn line_content_end(&self, line: LineIdx) -> Result<CharIdx> {
		self.check_line(line)?;
		Ok(line_content_end(self.content.slice(..), line))
	}

	/// Returns the text covered by `span`.
	pub fn slice_text(&self, span: Span) -> Result<String> {
		self.check_pos(span.end)?;
		Ok(self.content.slice(span.start..span.end).into())
	}

	/// Returns the text between two live anchors.
	pub fn text_between(&self, start: AnchorId, end: AnchorId) -> Result<String> {
		self.slice_text(Span::new(self.pos(start)?, self.pos(end)?))
	}

	/// Inserts `text` at `pos`. Anchors at `pos` move according to their bias.
	pub fn insert(&mut self, pos: CharIdx, text: &str) -> Result<()> {
		self.check_pos(pos)?;
		if text.is_empty() {
			return Ok(());
		}
		let tx = Transaction::insert(self.content.slice(..), pos, text);
		self.apply(tx, None)
	}

	/// Deletes the chars covered by `span`.
	///
	/// Anchors strictly inside the span become detached.
	pub fn delete(&mut self, span: Span) -> Result<()> {
		self.check_pos(span.end)?;
		if span.is_empty() {
			return Ok(());
		}
		let tx = Transaction::delete(self.content.slice(..), span);
		self.apply(tx, None)
	}

	/// Deletes whole lines `[first, last)`, including their line breaks.
	pub fn delete_lines(&mut self, first: LineIdx, last: LineIdx) -> Result<()> {
		let start = self.line_start(first)?;
		let end = if last >= self.len_lines() {
			self.len_chars()
		} else {
			self.line_start(last)?
		};
		self.delete(Span::new(start, end))
	}

	fn apply(&mut self, tx: Transaction, pinned: Option<(AnchorId, Bias)>) -> Result<()> {
		self.ensure_writable()?;
		let before = self.content.clone();

		tx.apply(&mut self.content);
		self.anchors.map_through_with(tx.changes(), pinned);

		match self.group.as_mut() {
			Some(group) => group.record(tx.into_changes()),
			None => {
				self.push_undo_entry(HistoryEntry {
					rope: before,
				});
				self.modified = true;
				self.version = self.version.wrapping_add(1);
			}
		}
		Ok(())
	}

	/// Checks if the document is writable, returning an error if readonly.
	fn ensure_writable(&self) -> Result<()> {
		if self.readonly {
			return Err(EditError::ReadOnly);
		}
		Ok(())
	}

	fn check_pos(&self, pos: CharIdx) -> Result<()> {
		let len = self.content.len_chars();
		if pos > len {
			return Err(EditError::OutOfBounds { pos, len });
		}
		Ok(())
	}

	fn check_line(&self, line: LineIdx) -> Result<()> {
		let lines = self.content.len_lines();
		if line >= lines {
			return Err(EditError::LineOutOfBounds { line, lines });
		}
		Ok(())
	}
}
