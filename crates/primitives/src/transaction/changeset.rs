use super::types::{Bias, Operation, Tendril};
use crate::range::{CharIdx, CharLen};
use crate::{Rope, RopeSlice};

/// Retain/delete/insert steps rewriting one text into another.
///
/// Every buffer edit is expressed as a changeset so live anchors can be mapped
/// through it; the changesets of one transaction compose into a single one.
/// Inserts always precede a delete at the same position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	ops: Vec<Operation>,
	len: usize,
	len_after: usize,
}

impl ChangeSet {
	/// Starts an empty changeset over `doc`; see [`ChangeSet::finish`].
	pub fn new(_doc: RopeSlice) -> Self {
		Self::default()
	}

	/// Retains whatever part of `doc` the steps so far have not covered.
	pub(crate) fn finish(&mut self, doc: RopeSlice) {
		let total = doc.len_chars();
		debug_assert!(self.len <= total, "changeset runs past the document end");
		self.retain(total.saturating_sub(self.len));
	}

	/// Length of the text before the change.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Length of the text after the change.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Returns true if there are no steps.
	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	/// Returns the steps in order.
	pub fn operations(&self) -> &[Operation] {
		&self.ops
	}

	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		self.len_after += n;
		match self.ops.last_mut() {
			Some(Operation::Retain(count)) => *count += n,
			_ => self.ops.push(Operation::Retain(n)),
		}
	}

	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		match self.ops.last_mut() {
			Some(Operation::Delete(count)) => *count += n,
			_ => self.ops.push(Operation::Delete(n)),
		}
	}

	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}
		self.len_after += text.chars().count();

		let at = match self.ops.last() {
			Some(Operation::Delete(_)) => self.ops.len() - 1,
			_ => self.ops.len(),
		};
		if let Some(Operation::Insert(prev)) = at.checked_sub(1).and_then(|i| self.ops.get_mut(i)) {
			prev.push_str(&text);
		} else {
			self.ops.insert(at, Operation::Insert(text));
		}
	}

	/// Rewrites `doc` in place.
	pub fn apply(&self, doc: &mut Rope) {
		let mut pos = 0;
		for op in &self.ops {
			match op {
				Operation::Retain(n) => pos += n,
				Operation::Delete(n) => doc.remove(pos..pos + n),
				Operation::Insert(text) => {
					doc.insert(pos, text);
					pos += text.chars().count();
				}
			}
		}
	}

	/// Maps a position of the old text into the new text.
	///
	/// A position inside a deleted run lands on the run's start.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		self.walk(pos, bias).0
	}

	/// Maps a live anchor into the new text.
	///
	/// Like [`ChangeSet::map_pos`], except that a position strictly inside a
	/// deleted run has lost its text and yields [`None`]. Positions on either
	/// edge of a deletion survive.
	pub fn map_anchor(&self, pos: CharIdx, bias: Bias) -> Option<CharIdx> {
		match self.walk(pos, bias) {
			(_, true) => None,
			(mapped, false) => Some(mapped),
		}
	}

	/// Returns the mapped position and whether it fell inside a deletion.
	fn walk(&self, pos: CharIdx, bias: Bias) -> (CharIdx, bool) {
		let (mut old, mut new) = (0, 0);
		for op in &self.ops {
			match op {
				Operation::Retain(n) => {
					if pos < old + n {
						return (new + pos - old, false);
					}
					old += n;
					new += n;
				}
				Operation::Delete(n) => {
					if pos < old + n {
						return (new, pos > old);
					}
					old += n;
				}
				Operation::Insert(text) => {
					if pos == old && bias == Bias::Left {
						return (new, false);
					}
					new += text.chars().count();
				}
			}
		}
		(new + pos.saturating_sub(old), false)
	}

	/// Chains `next`, which must apply to this changeset's output, into one
	/// changeset from this one's input to `next`'s output.
	pub fn compose(self, next: ChangeSet) -> ChangeSet {
		debug_assert_eq!(self.len_after, next.len, "changesets do not chain");

		let mut out = ChangeSet::default();
		let mut first = self.ops.into_iter();
		let mut pending = first.next();

		for op in next.ops {
			// consume this many chars of the first changeset's output
			let mut left = op.len_before();
			let keep = match op {
				Operation::Insert(text) => {
					out.insert(text);
					continue;
				}
				Operation::Retain(_) => true,
				Operation::Delete(_) => false,
			};

			while left > 0 {
				let Some(current) = pending.take() else {
					break;
				};
				pending = match current {
					Operation::Delete(n) => {
						out.delete(n);
						first.next()
					}
					Operation::Retain(n) => {
						let step = n.min(left);
						left -= step;
						if keep {
							out.retain(step);
						} else {
							out.delete(step);
						}
						if n > step { Some(Operation::Retain(n - step)) } else { first.next() }
					}
					Operation::Insert(mut text) => {
						let chars = text.chars().count();
						let step = chars.min(left);
						left -= step;
						let tail = split_off_chars(&mut text, step);
						if keep {
							out.insert(text);
						}
						if tail.is_empty() { first.next() } else { Some(Operation::Insert(tail)) }
					}
				};
			}
		}

		while let Some(op) = pending {
			debug_assert!(matches!(op, Operation::Delete(_)), "first changeset outlives the second");
			out.delete(op.len_before());
			pending = first.next();
		}

		debug_assert_eq!(out.len_after, next.len_after);
		out
	}
}

/// Leaves the first `chars` chars in `text` and returns the rest.
fn split_off_chars(text: &mut Tendril, chars: CharLen) -> Tendril {
	let byte = text.char_indices().nth(chars).map_or(text.len(), |(index, _)| index);
	text.split_off(byte)
}
