//! Anchor-relative edits.
//!
//! Each method resolves its anchor at call time, performs one or more
//! transactions, and hands back either a fresh cursor anchor or a count.
//! Cursors are created with [`Bias::Right`] so further text typed at them
//! lands before them; callers release cursors when done.

use regionize_primitives::{AnchorId, Bias, Change, CharIdx, LineIdx, Span, Transaction};

use super::Document;
use crate::error::Result;

impl Document {
	/// Inserts `text` so that it ends up before `anchor`.
	///
	/// Returns a cursor at the end of the inserted text.
	pub fn insert_text_before(&mut self, anchor: AnchorId, text: &str) -> Result<AnchorId> {
		self.insert_pinned(anchor, text, Bias::Right)
	}

	/// Inserts `text` so that it ends up after `anchor`.
	///
	/// Returns a cursor at the end of the inserted text.
	pub fn insert_text_after(&mut self, anchor: AnchorId, text: &str) -> Result<AnchorId> {
		self.insert_pinned(anchor, text, Bias::Left)
	}

	/// Deletes from `anchor` to the end of its line's content.
	///
	/// The line break itself is kept. Returns a cursor at the anchor position.
	pub fn delete_through_end_of_line(&mut self, anchor: AnchorId) -> Result<AnchorId> {
		let pos = self.pos(anchor)?;
		let end = self.line_content_end(self.content.char_to_line(pos))?;
		self.delete(Span::new(pos, end))?;
		self.cursor(pos)
	}

	/// Deletes the whitespace-only lines directly below the anchor's line.
	///
	/// Returns the number of lines removed.
	pub fn delete_trailing_blank_lines(&mut self, anchor: AnchorId) -> Result<usize> {
		let line = self.line_of(anchor)?;
		let first = line + 1;
		let last = self.blank_run_end(first)?;
		if last > first {
			self.delete_lines(first, last)?;
		}
		Ok(last.saturating_sub(first))
	}

	/// Deletes the whitespace-only lines directly above the anchor's line.
	///
	/// Returns the number of lines removed.
	pub fn delete_leading_blank_lines(&mut self, anchor: AnchorId) -> Result<usize> {
		let line = self.line_of(anchor)?;
		let first = self.blank_run_start(line)?;
		if first < line {
			self.delete_lines(first, line)?;
		}
		Ok(line - first)
	}

	/// Gives the anchor's line the same indentation as the line of `other`.
	pub fn reindent_to_match(&mut self, anchor: AnchorId, other: AnchorId) -> Result<()> {
		let indent = self.leading_whitespace(self.line_of(other)?)?;
		self.set_line_indent(self.line_of(anchor)?, &indent)
	}

	/// Replaces the leading whitespace of `line` with `indent`.
	///
	/// Anchors at the very start of the line stay there.
	pub fn set_line_indent(&mut self, line: LineIdx, indent: &str) -> Result<()> {
		let current = self.leading_whitespace(line)?;
		if current == indent {
			return Ok(());
		}

		let start = self.line_start(line)?;
		let pinned = self.anchors.ids_at(start);
		let tx = Transaction::change(
			self.content.slice(..),
			[Change {
				start,
				end: start + current.chars().count(),
				replacement: Some(indent.to_string()),
			}],
		);
		self.apply(tx, None)?;

		for id in pinned {
			self.anchors.set_pos(id, start);
		}
		Ok(())
	}

	/// Returns the first line of the blank run that ends just above `line`.
	pub fn blank_run_start(&self, line: LineIdx) -> Result<LineIdx> {
		self.check_line(line)?;
		let mut first = line;
		while first > 0 && self.is_blank_line(first - 1)? {
			first -= 1;
		}
		Ok(first)
	}

	/// Returns the line after the blank run starting at `line`.
	///
	/// The empty line after a trailing newline never counts as part of a run.
	pub fn blank_run_end(&self, line: LineIdx) -> Result<LineIdx> {
		let limit = self.content_line_count();
		let mut last = line;
		while last < limit && self.is_blank_line(last)? {
			last += 1;
		}
		Ok(last)
	}

	fn insert_pinned(&mut self, anchor: AnchorId, text: &str, bias: Bias) -> Result<AnchorId> {
		let pos = self.pos(anchor)?;
		if !text.is_empty() {
			let tx = Transaction::insert(self.content.slice(..), pos, text);
			self.apply(tx, Some((anchor, bias)))?;
		}
		self.cursor(pos + text.chars().count())
	}

	fn cursor(&mut self, pos: CharIdx) -> Result<AnchorId> {
		self.create_anchor(pos, Bias::Right)
	}
}
