//! Placement of region marker lines.
//!
//! Markers always occupy whole lines. Blank lines around them are normalized
//! rather than only added, so stripping markers and writing them again
//! reproduces the same text:
//!
//! * above an opening marker: none after a line that opens a scope or holds
//!   another opening marker, none at the start of the file, one otherwise;
//! * below a closing marker: none before a line that closes a scope or holds
//!   another closing marker, one otherwise, and the file ends with a single
//!   line break when nothing follows.

use regionize_document::{AnchorId, Bias, Document, LineIdx, Span};
use tracing::trace;

use crate::config::{LayoutConfig, MarkerSyntax};
use crate::error::Result;

#[cfg(test)]
mod tests;

/// Returns true if the line opens a brace scope.
pub(crate) fn opens_scope(line: &str) -> bool {
	let line = line.trim();
	line.starts_with('{') || line.ends_with('{')
}

/// Returns true if the line closes a brace scope.
pub(crate) fn closes_scope(line: &str) -> bool {
	line.trim_start().starts_with('}')
}

/// Writes marker lines relative to declaration anchors.
pub(crate) struct MarkerWriter<'a> {
	config: &'a LayoutConfig,
}

impl<'a> MarkerWriter<'a> {
	pub(crate) fn new(config: &'a LayoutConfig) -> Self {
		Self { config }
	}

	fn syntax(&self) -> &MarkerSyntax {
		&self.config.markers
	}

	fn newline(&self) -> &'static str {
		self.config.line_ending.as_str()
	}

	/// Inserts an opening marker on its own line above `at`.
	///
	/// Returns an anchor at the start of the marker line.
	pub(crate) fn open(&self, doc: &mut Document, label: &str, at: AnchorId) -> Result<AnchorId> {
		let nl = self.newline();

		let line = doc.line_of(at)?;
		let indent = doc.leading_whitespace(line)?;
		let content_start = doc.line_start(line)? + indent.chars().count();
		let pos = doc.pos(at)?;
		if pos > content_start {
			let before = doc.slice_text(Span::new(content_start, pos))?;
			let gap = before.chars().rev().take_while(|c| c.is_whitespace()).count();
			if gap > 0 {
				doc.delete(Span::new(pos - gap, pos))?;
			}
			let cursor = doc.insert_text_before(at, &format!("{nl}{indent}"))?;
			doc.release(cursor);
		}

		let line = doc.line_of(at)?;
		self.normalize_above(doc, line)?;

		let line = doc.line_of(at)?;
		let start = doc.line_start(line)?;
		doc.insert(start, &format!("{}{nl}", self.syntax().render_open(label)))?;
		let marker = doc.create_anchor(start, Bias::Right)?;
		doc.reindent_to_match(marker, at)?;

		trace!(label, line, "opening marker inserted");
		Ok(marker)
	}

	/// Inserts a closing marker on its own line below `at`.
	///
	/// Returns an anchor just past the marker text.
	pub(crate) fn close(&self, doc: &mut Document, at: AnchorId) -> Result<AnchorId> {
		let nl = self.newline();

		let pos = doc.pos(at)?;
		let line = doc.line_of(at)?;
		let indent = doc.leading_whitespace(line)?;
		let rest = doc.slice_text(Span::new(pos, doc.line_content_end(line)?))?;
		let gap = rest.chars().take_while(|c| c.is_whitespace()).count();
		let trailing = rest.chars().count() > gap;
		if gap > 0 {
			doc.delete(Span::new(pos, pos + gap))?;
		}

		let marker = format!("{nl}{indent}{}", self.syntax().render_close());
		let mut text = marker.clone();
		if trailing {
			text.push_str(nl);
			text.push_str(&indent);
		}
		let cursor = doc.insert_text_after(at, &text)?;
		doc.release(cursor);
		let end = doc.create_anchor(pos + marker.chars().count(), Bias::Left)?;

		self.normalize_below(doc, end)?;

		trace!(line = line + 1, moved = trailing, "closing marker inserted");
		Ok(end)
	}

	fn normalize_above(&self, doc: &mut Document, line: LineIdx) -> Result<()> {
		let first = doc.blank_run_start(line)?;
		let wanted = match first.checked_sub(1) {
			None => 0,
			Some(prev) => {
				let text = doc.line_text(prev)?;
				usize::from(!(opens_scope(&text) || self.syntax().is_open_marker(&text)))
			}
		};

		let have = line - first;
		if have > wanted {
			doc.delete_lines(first, first + have - wanted)?;
		} else if have < wanted {
			let start = doc.line_start(line)?;
			doc.insert(start, self.newline())?;
		}
		Ok(())
	}

	fn normalize_below(&self, doc: &mut Document, end: AnchorId) -> Result<()> {
		let nl = self.newline();
		let first = doc.line_of(end)? + 1;
		let limit = doc.content_line_count();
		let last = doc.blank_run_end(first)?;

		if last >= limit {
			let tail = Span::new(doc.pos(end)?, doc.len_chars());
			if doc.slice_text(tail)? != nl {
				doc.delete(tail)?;
				let cursor = doc.insert_text_after(end, nl)?;
				doc.release(cursor);
			}
			return Ok(());
		}

		let next = doc.line_text(last)?;
		let wanted = usize::from(!(closes_scope(&next) || self.syntax().is_close_marker(&next)));
		let have = last - first;
		if have > wanted {
			doc.delete_lines(first + wanted, last)?;
		} else if have < wanted {
			let cursor = doc.insert_text_after(end, nl)?;
			doc.release(cursor);
		}
		Ok(())
	}
}
