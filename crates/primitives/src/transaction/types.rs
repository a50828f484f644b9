use crate::range::{CharIdx, CharLen};

/// Owned text carried by an insertion.
pub type Tendril = String;

/// Replacement of the chars in `[start, end)`.
///
/// A [`None`] replacement deletes the range; an empty range inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
	/// First char replaced.
	pub start: CharIdx,
	/// One past the last char replaced.
	pub end: CharIdx,
	/// Text written in place of the range.
	pub replacement: Option<Tendril>,
}

/// Side a position sticks to when text is inserted exactly at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Stay before the inserted text.
	Left,
	/// Move past the inserted text.
	Right,
}

/// One step of a [`ChangeSet`](super::ChangeSet), read left to right over
/// the old text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Keep the next N chars.
	Retain(CharLen),
	/// Drop the next N chars.
	Delete(CharLen),
	/// Write text at the current position.
	Insert(Tendril),
}

impl Operation {
	/// Chars of old text this step consumes.
	pub fn len_before(&self) -> CharLen {
		match self {
			Self::Retain(n) | Self::Delete(n) => *n,
			Self::Insert(_) => 0,
		}
	}

	/// Chars of new text this step produces.
	pub fn len_after(&self) -> CharLen {
		match self {
			Self::Retain(n) => *n,
			Self::Delete(_) => 0,
			Self::Insert(text) => text.chars().count(),
		}
	}
}
