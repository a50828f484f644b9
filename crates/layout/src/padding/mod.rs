//! Blank-line padding between declarations.
//!
//! Classes get one blank line after their last constant and around every
//! method and multi-line property; interfaces only after their last method.
//! Containers themselves are padded after their members. A blank line is
//! never added next to another blank line, a brace line, or a marker line.

use regionize_document::{CharIdx, Document, Span};
use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::markers::{closes_scope, opens_scope};
use crate::tree::{Decl, DeclId, DeclKind, DeclTree};


/// Returns true if `node` should be separated from its neighbours by blank
/// lines, which is the case exactly when a region was written around it in
/// the current pass.
pub fn should_pad(tree: &DeclTree, node: Option<DeclId>) -> bool {
	node.and_then(|id| tree.get(id))
		.is_some_and(|decl| decl.associated_region.is_some())
}

/// Counts from [`BlankLinePadder::insert_paddings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingReport {
	/// Blank lines written.
	pub inserted: usize,
}

/// Writes blank lines around declarations.
pub struct BlankLinePadder<'a> {
	config: &'a LayoutConfig,
}

impl<'a> BlankLinePadder<'a> {
	/// Creates a padder using `config` for line endings and marker recognition.
	pub fn new(config: &'a LayoutConfig) -> Self {
		Self { config }
	}

	/// Pads every scope of `tree`, members before their container.
	pub fn insert_paddings(&self, doc: &mut Document, tree: &DeclTree) -> Result<PaddingReport> {
		let mut report = PaddingReport::default();
		self.scope(doc, tree, tree.roots(), &mut report)?;
		debug!(inserted = report.inserted, "paddings inserted");
		Ok(report)
	}

	fn scope(&self, doc: &mut Document, tree: &DeclTree, members: &[DeclId], report: &mut PaddingReport) -> Result<()> {
		let mut containers = Vec::new();
		for &id in members {
			match &tree.node(id)?.kind {
				DeclKind::Class { children } => {
					self.class_members(doc, tree, children, report)?;
					self.scope(doc, tree, children, report)?;
				}
				DeclKind::Interface { children } => {
					self.interface_members(doc, tree, children, report)?;
					self.scope(doc, tree, children, report)?;
				}
				DeclKind::Namespace { children } => self.scope(doc, tree, children, report)?,
				_ => continue,
			}
			containers.push(id);
		}

		for id in containers {
			if should_pad(tree, Some(id)) {
				let decl = tree.node(id)?;
				self.pad_before(doc, decl, report)?;
				self.pad_after(doc, decl, report)?;
			}
		}
		Ok(())
	}

	fn class_members(&self, doc: &mut Document, tree: &DeclTree, members: &[DeclId], report: &mut PaddingReport) -> Result<()> {
		let constants = materialized(doc, tree, members)
			.filter(|(_, decl)| matches!(decl.kind, DeclKind::Constants))
			.collect::<Vec<_>>();
		if let Some((_, last)) = last_in_document(doc, &constants)? {
			self.pad_after(doc, last, report)?;
		}

		let mut padded = Vec::new();
		for (id, decl) in materialized(doc, tree, members) {
			let eligible = match decl.kind {
				DeclKind::Method { .. } => true,
				DeclKind::Property => decl.is_multi_line(doc)?,
				_ => false,
			};
			if eligible && should_pad(tree, Some(id)) {
				padded.push(decl);
			}
		}
		for decl in padded {
			self.pad_before(doc, decl, report)?;
			self.pad_after(doc, decl, report)?;
		}
		Ok(())
	}

	fn interface_members(&self, doc: &mut Document, tree: &DeclTree, members: &[DeclId], report: &mut PaddingReport) -> Result<()> {
		let methods = materialized(doc, tree, members)
			.filter(|(_, decl)| matches!(decl.kind, DeclKind::Method { .. }))
			.collect::<Vec<_>>();
		if let Some((_, last)) = last_in_document(doc, &methods)? {
			self.pad_after(doc, last, report)?;
		}
		Ok(())
	}

	/// Adds a blank line above `decl` unless it is already separated.
	fn pad_before(&self, doc: &mut Document, decl: &Decl, report: &mut PaddingReport) -> Result<()> {
		let line = doc.line_of(decl.start)?;
		if line == 0 || doc.column_of(decl.start)? > doc.leading_whitespace(line)?.chars().count() {
			return Ok(());
		}
		let above = doc.line_text(line - 1)?;
		if above.trim().is_empty() || opens_scope(&above) || self.config.markers.is_marker(&above) {
			return Ok(());
		}

		let start = doc.line_start(line)?;
		doc.insert(start, self.config.line_ending.as_str())?;
		report.inserted += 1;
		trace!(name = %decl.name, line, "blank line inserted before");
		Ok(())
	}

	/// Adds a blank line below `decl` unless it is already separated.
	fn pad_after(&self, doc: &mut Document, decl: &Decl, report: &mut PaddingReport) -> Result<()> {
		let line = doc.line_of(decl.end)?;
		let next = line + 1;
		if next >= doc.content_line_count() {
			return Ok(());
		}
		let rest = doc.slice_text(Span::new(doc.pos(decl.end)?, doc.line_content_end(line)?))?;
		if !rest.trim().is_empty() {
			return Ok(());
		}
		let below = doc.line_text(next)?;
		if below.trim().is_empty() || closes_scope(&below) || self.config.markers.is_marker(&below) {
			return Ok(());
		}

		let start = doc.line_start(next)?;
		doc.insert(start, self.config.line_ending.as_str())?;
		report.inserted += 1;
		trace!(name = %decl.name, line = next, "blank line inserted after");
		Ok(())
	}
}

/// Members of `ids` that still have text, in the given order.
fn materialized<'t>(
	doc: &Document,
	tree: &'t DeclTree,
	ids: &'t [DeclId],
) -> impl Iterator<Item = (DeclId, &'t Decl)> {
	ids.iter()
		.filter_map(move |&id| tree.get(id).map(|decl| (id, decl)))
		.filter(move |(_, decl)| decl.is_materialized(doc))
}

/// The member that starts last in the buffer.
fn last_in_document<'t>(doc: &Document, members: &[(DeclId, &'t Decl)]) -> Result<Option<(DeclId, &'t Decl)>> {
	let mut last: Option<(CharIdx, DeclId, &'t Decl)> = None;
	for &(id, decl) in members {
		let pos = doc.pos(decl.start)?;
		if last.is_none_or(|(best, _, _)| pos > best) {
			last = Some((pos, id, decl));
		}
	}
	Ok(last.map(|(_, id, decl)| (id, decl)))
}
