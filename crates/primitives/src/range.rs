/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for every buffer operation.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A zero-based line index.
pub type LineIdx = usize;

/// A half-open char span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
	/// First char covered by the span.
	pub start: CharIdx,
	/// One past the last char covered by the span.
	pub end: CharIdx,
}

impl Span {
	/// Creates a span, ordering the endpoints if they arrive reversed.
	pub fn new(a: CharIdx, b: CharIdx) -> Self {
		Self {
			start: a.min(b),
			end: a.max(b),
		}
	}

	/// Creates a zero-width span at the given position.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Returns the length of the span in characters.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.end - self.start
	}

	/// Returns true if the span covers no characters.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if the position is within the span (exclusive of end).
	pub fn contains(&self, pos: CharIdx) -> bool {
		pos >= self.start && pos < self.end
	}

	/// Returns true if `pos` lies strictly between the endpoints.
	///
	/// Deleting a span destroys exactly these positions; the endpoints
	/// themselves survive and collapse onto `start`.
	pub fn encloses(&self, pos: CharIdx) -> bool {
		pos > self.start && pos < self.end
	}

	/// Returns true if this span overlaps with another.
	pub fn overlaps(&self, other: &Span) -> bool {
		if self.start < other.end && other.start < self.end {
			return true;
		}

		self.is_empty() && other.is_empty() && self.start == other.start
	}

	/// Returns the smallest span covering both spans.
	pub fn merge(&self, other: &Span) -> Self {
		Self::new(self.start.min(other.start), self.end.max(other.end))
	}

	/// Clamps both endpoints to `[0, max_char]`.
	pub fn clamp(&self, max_char: CharIdx) -> Self {
		Self::new(self.start.min(max_char), self.end.min(max_char))
	}
}

impl From<std::ops::Range<CharIdx>> for Span {
	fn from(range: std::ops::Range<CharIdx>) -> Self {
		Self::new(range.start, range.end)
	}
}
