//! Live anchors.
//!
//! An [`AnchorTable`] is the edit-aware offset table behind every position the
//! layout engines hold. Each committed edit is handed to
//! [`AnchorTable::map_through`] as a [`ChangeSet`], and every live anchor is
//! moved in the order the edits were issued. An anchor whose text is deleted
//! becomes [`AnchorState::Detached`] and stays that way until released.
//!
//! Ids carry a generation, so an id kept past [`AnchorTable::release`] never
//! aliases a newer anchor that reuses the slot.

use slab::Slab;

use crate::range::CharIdx;
use crate::transaction::{Bias, ChangeSet};


/// Handle to an anchor in an [`AnchorTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId {
	key: usize,
	generation: u32,
}

/// Current state of an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
	/// The anchor tracks this char position.
	Live(CharIdx),
	/// The text under the anchor was deleted.
	Detached,
}

#[derive(Debug, Clone)]
struct Entry {
	pos: CharIdx,
	bias: Bias,
	live: bool,
	generation: u32,
}

/// Slab of live positions, remapped after every edit.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
	entries: Slab<Entry>,
	next_generation: u32,
}

impl AnchorTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a live anchor at `pos`.
	pub fn create(&mut self, pos: CharIdx, bias: Bias) -> AnchorId {
		let generation = self.next_generation;
		self.next_generation = self.next_generation.wrapping_add(1);
		let key = self.entries.insert(Entry {
			pos,
			bias,
			live: true,
			generation,
		});
		AnchorId {
			key,
			generation,
		}
	}

	/// Drops an anchor. Returns false if the id was already gone.
	pub fn release(&mut self, id: AnchorId) -> bool {
		if self.entry(id).is_none() {
			return false;
		}
		self.entries.remove(id.key);
		true
	}

	/// Returns the anchor's state, or [`None`] for an unknown or released id.
	pub fn state(&self, id: AnchorId) -> Option<AnchorState> {
		self.entry(id).map(|entry| {
			if entry.live {
				AnchorState::Live(entry.pos)
			} else {
				AnchorState::Detached
			}
		})
	}

	/// Returns the bias the anchor was created with.
	pub fn bias(&self, id: AnchorId) -> Option<Bias> {
		self.entry(id).map(|entry| entry.bias)
	}

	/// Moves a live anchor to `pos`. Returns false for unknown or detached ids.
	pub fn set_pos(&mut self, id: AnchorId, pos: CharIdx) -> bool {
		match self.entry_mut(id) {
			Some(entry) if entry.live => {
				entry.pos = pos;
				true
			}
			_ => false,
		}
	}

	/// Number of anchors in the table, live or detached.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the table holds no anchors.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of anchors that still track a position.
	pub fn live_count(&self) -> usize {
		self.entries.iter().filter(|(_, entry)| entry.live).count()
	}

	/// Returns the live anchors sitting exactly at `pos`.
	pub fn ids_at(&self, pos: CharIdx) -> Vec<AnchorId> {
		self.entries
			.iter()
			.filter(|(_, entry)| entry.live && entry.pos == pos)
			.map(|(key, entry)| AnchorId {
				key,
				generation: entry.generation,
			})
			.collect()
	}

	/// Marks every anchor detached.
	///
	/// Used when the whole text is swapped out (undo, redo) and no position
	/// can be carried across.
	pub fn detach_all(&mut self) {
		for (_, entry) in self.entries.iter_mut() {
			entry.live = false;
		}
	}

	/// Maps every live anchor through `changes` using its own bias.
	pub fn map_through(&mut self, changes: &ChangeSet) {
		self.map_through_with(changes, None);
	}

	/// Maps every live anchor through `changes`, forcing `pinned` to the given bias.
	///
	/// Used when text is inserted explicitly before or after one anchor: that
	/// anchor must land on the requested side regardless of how it was created.
	pub fn map_through_with(&mut self, changes: &ChangeSet, pinned: Option<(AnchorId, Bias)>) {
		for (key, entry) in self.entries.iter_mut() {
			if !entry.live {
				continue;
			}

			let bias = match pinned {
				Some((id, bias)) if id.key == key && id.generation == entry.generation => {
					bias
				}
				_ => entry.bias,
			};

			match changes.map_anchor(entry.pos, bias) {
				Some(pos) => entry.pos = pos,
				None => entry.live = false,
			}
		}
	}

	fn entry(&self, id: AnchorId) -> Option<&Entry> {
		self.entries
			.get(id.key)
			.filter(|entry| entry.generation == id.generation)
	}

	fn entry_mut(&mut self, id: AnchorId) -> Option<&mut Entry> {
		self.entries
			.get_mut(id.key)
			.filter(|entry| entry.generation == id.generation)
	}
}
