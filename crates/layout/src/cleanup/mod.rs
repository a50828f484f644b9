//! Region cleanup.
//!
//! Regions are removed from the bottom of the file upwards. Each marker line
//! is deleted together with the blank lines around it and replaced by a
//! single blank placeholder line, which the next insertion normalizes.

use regionize_document::{AnchorId, Document};
use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::tree::{Decl, DeclId, DeclKind, DeclTree};

#[cfg(test)]
mod tests;

/// Counts from [`RegionCleaner::cleanup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
	/// Regions whose markers were removed.
	pub removed: usize,
	/// Regions left alone (invalidated, pseudo-group, or without text).
	pub skipped: usize,
}

/// Removes region markers found in a parsed tree.
pub struct RegionCleaner<'a> {
	config: &'a LayoutConfig,
}

impl<'a> RegionCleaner<'a> {
	/// Creates a cleaner writing placeholders with `config`'s line ending.
	pub fn new(config: &'a LayoutConfig) -> Self {
		Self { config }
	}

	/// Removes every region in `tree`, last start line first, then drops the
	/// region nodes from the hierarchy.
	pub fn cleanup(&self, doc: &mut Document, tree: &mut DeclTree) -> Result<CleanupReport> {
		let mut report = CleanupReport::default();

		let mut pending = Vec::new();
		for id in tree.regions() {
			let decl = tree.node(id)?;
			match skip_reason(doc, decl) {
				Some(reason) => {
					trace!(label = region_label(decl), reason, "region skipped");
					report.skipped += 1;
				}
				None => pending.push((doc.line_of(decl.start)?, id)),
			}
		}
		pending.sort_by(|a, b| b.cmp(a));

		for (_, id) in pending {
			if self.remove_region(doc, tree, id)? {
				report.removed += 1;
			}
		}
		tree.detach_regions();

		debug!(removed = report.removed, skipped = report.skipped, "regions cleaned up");
		Ok(report)
	}

	/// Removes the markers of one region and marks it invalidated.
	///
	/// Returns `false` without touching the buffer when the region is already
	/// invalidated, is a pseudo-group, or lost its text.
	pub fn remove_region(&self, doc: &mut Document, tree: &mut DeclTree, id: DeclId) -> Result<bool> {
		let decl = tree.node(id)?;
		if decl.region().is_none() {
			return Err(LayoutError::Invariant(format!(
				"{} `{}` is not a region",
				decl.tag(),
				decl.name
			)));
		}
		if let Some(reason) = skip_reason(doc, decl) {
			trace!(label = region_label(decl), reason, "region skipped");
			return Ok(false);
		}

		let (start, end) = (decl.start, decl.end);
		let start_line = doc.line_of(start)?;
		let end_line = doc.line_of(end)?;
		if start_line > end_line {
			return Err(LayoutError::InvertedExtent {
				kind: decl.tag(),
				name: region_label(decl).to_string(),
				start: start_line,
				end: end_line,
			});
		}
		if start_line == end_line {
			return Err(LayoutError::Invariant(format!(
				"region `{}` opens and closes on line {start_line}",
				region_label(decl)
			)));
		}

		self.remove_marker_line(doc, end)?;
		self.remove_marker_line(doc, start)?;
		doc.release(start);
		doc.release(end);

		if let DeclKind::Region(marker) = &mut tree.node_mut(id)?.kind {
			marker.invalidated = true;
			trace!(label = %marker.label, line = start_line, "region removed");
		}
		Ok(true)
	}

	fn remove_marker_line(&self, doc: &mut Document, anchor: AnchorId) -> Result<()> {
		let line = doc.line_of(anchor)?;
		let first = doc.blank_run_start(line)?;
		let last = doc.blank_run_end(line + 1)?;
		doc.delete_lines(first, last)?;

		let placeholder = doc.line_start(first)?;
		doc.insert(placeholder, self.config.line_ending.as_str())?;
		Ok(())
	}
}

fn skip_reason(doc: &Document, decl: &Decl) -> Option<&'static str> {
	match decl.region() {
		None => Some("not a region"),
		Some(marker) if marker.invalidated => Some("invalidated"),
		Some(marker) if marker.pseudo_group => Some("pseudo-group"),
		Some(_) if !decl.is_materialized(doc) => Some("not materialized"),
		Some(_) => None,
	}
}

fn region_label(decl: &Decl) -> &str {
	decl.region().map_or("", |marker| marker.label.as_str())
}
