//! Rope utilities and line helpers.
//!
//! Line indices are zero-based. "Content" excludes the line break, so a line
//! holding `"    }\r\n"` has content `"    }"`.

use ropey::RopeSlice;

use crate::range::{CharIdx, LineIdx};

/// Returns the number of lines that can hold content.
///
/// Unlike [`RopeSlice::len_lines`], the empty line after a trailing newline
/// is not counted.
pub fn content_line_count(text: RopeSlice) -> usize {
	let lines = text.len_lines();
	if lines > 1 && text.line(lines - 1).len_chars() == 0 {
		lines - 1
	} else {
		lines
	}
}

/// Returns the text of `line` without its line break.
pub fn line_content(text: RopeSlice, line: LineIdx) -> String {
	let mut content: String = text.line(line).into();
	while content.ends_with(['\n', '\r']) {
		content.pop();
	}
	content
}

/// Returns the char index just past the last content char of `line`.
pub fn line_content_end(text: RopeSlice, line: LineIdx) -> CharIdx {
	text.line_to_char(line) + line_content(text, line).chars().count()
}

/// Returns true if `line` contains nothing but whitespace.
pub fn is_blank_line(text: RopeSlice, line: LineIdx) -> bool {
	text.line(line).chars().all(char::is_whitespace)
}

/// Returns the leading horizontal whitespace of `line`.
pub fn leading_whitespace(text: RopeSlice, line: LineIdx) -> String {
	text.line(line)
		.chars()
		.take_while(|c| *c == ' ' || *c == '\t')
		.collect()
}

#[cfg(test)]
mod tests {
	use ropey::Rope;

	use super::*;

	#[test]
	fn test_no_trailing_newline() {
		let text = Rope::from("hello\nworld");
		assert_eq!(text.len_lines(), 2);
		assert_eq!(content_line_count(text.slice(..)), 2);
	}

	#[test]
	fn test_trailing_newline() {
		let text = Rope::from("hello\nworld\n");
		assert_eq!(text.len_lines(), 3);
		assert_eq!(content_line_count(text.slice(..)), 2);
	}

	#[test]
	fn test_empty() {
		let text = Rope::from("");
		assert_eq!(content_line_count(text.slice(..)), 1);
	}

	#[test]
	fn test_line_content_strips_crlf() {
		let text = Rope::from("    }\r\nnext");
		assert_eq!(line_content(text.slice(..), 0), "    }");
		assert_eq!(line_content_end(text.slice(..), 0), 5);
		assert_eq!(line_content(text.slice(..), 1), "next");
	}

	#[test]
	fn test_blank_lines() {
		let text = Rope::from("a\n   \n\t\nb");
		let slice = text.slice(..);
		assert!(!is_blank_line(slice, 0));
		assert!(is_blank_line(slice, 1));
		assert!(is_blank_line(slice, 2));
		assert!(!is_blank_line(slice, 3));
	}

	#[test]
	fn test_leading_whitespace() {
		let text = Rope::from("\t  int x;\nclass A");
		assert_eq!(leading_whitespace(text.slice(..), 0), "\t  ");
		assert_eq!(leading_whitespace(text.slice(..), 1), "");
	}
}
