//! Region insertion.
//!
//! Each scope is annotated in a fixed order: per-member regions (with
//! overload groups), then one block region per member kind, then a region
//! around every class. Nested scopes are handled after their parent. Every
//! new marker goes around the outermost region already wrapping its target,
//! so later wraps always enclose earlier ones.

use indexmap::IndexMap;
use regionize_document::{CharIdx, Document};
use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::markers::MarkerWriter;
use crate::tree::{Decl, DeclId, DeclKind, DeclTag, DeclTree, RegionMarker};


/// Counts of regions written by [`RegionInserter::insert_regions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionReport {
	/// Regions around single methods or properties.
	pub members: usize,
	/// Regions around members sharing a name.
	pub groups: usize,
	/// Regions around all members of one kind.
	pub blocks: usize,
	/// Regions around classes.
	pub classes: usize,
}

impl InsertionReport {
	/// Total number of regions written.
	pub fn total(&self) -> usize {
		self.members + self.groups + self.blocks + self.classes
	}
}

/// Writes fresh region markers around declarations.
pub struct RegionInserter<'a> {
	config: &'a LayoutConfig,
	markers: MarkerWriter<'a>,
}

impl<'a> RegionInserter<'a> {
	/// Creates an inserter using `config` for marker syntax and labels.
	pub fn new(config: &'a LayoutConfig) -> Self {
		Self {
			config,
			markers: MarkerWriter::new(config),
		}
	}

	/// Annotates every scope of `tree`, outer scopes first.
	///
	/// Wrapped methods, properties and classes get their
	/// [`Decl::associated_region`] set; every new region node is recorded in
	/// [`DeclTree::generated`].
	pub fn insert_regions(&self, doc: &mut Document, tree: &mut DeclTree) -> Result<InsertionReport> {
		let mut report = InsertionReport::default();
		let roots = tree.roots().to_vec();
		self.scope(doc, tree, &roots, &mut report)?;

		debug!(
			members = report.members,
			groups = report.groups,
			blocks = report.blocks,
			classes = report.classes,
			"regions inserted"
		);
		Ok(report)
	}

	fn scope(
		&self,
		doc: &mut Document,
		tree: &mut DeclTree,
		members: &[DeclId],
		report: &mut InsertionReport,
	) -> Result<()> {
		let members = in_document_order(doc, tree, members)?;

		self.wrap_members(doc, tree, &members, DeclTag::Method, report)?;
		self.wrap_members(doc, tree, &members, DeclTag::Property, report)?;

		let labels = &self.config.labels;
		for (tag, label) in [
			(DeclTag::Field, &labels.class_variables),
			(DeclTag::Constructor, &labels.constructors),
			(DeclTag::Method, &labels.methods),
			(DeclTag::Property, &labels.properties),
		] {
			let block = of_kind(tree, &members, tag);
			if block.is_empty() {
				continue;
			}
			self.wrap(doc, tree, &block, label.clone(), false)?;
			report.blocks += 1;
		}

		for id in of_kind(tree, &members, DeclTag::Class) {
			let label = self.config.labels.class_label(&tree.node(id)?.name);
			let region = self.wrap(doc, tree, &[id], label, false)?;
			tree.node_mut(id)?.associated_region = Some(region);
			report.classes += 1;
		}

		for id in members {
			let decl = tree.node(id)?;
			if !decl.kind.is_container() {
				continue;
			}
			let children = decl.kind.children().to_vec();
			self.scope(doc, tree, &children, report)?;
		}
		Ok(())
	}

	/// Wraps each multi-line member of `tag`, then each name shared by more
	/// than one of them.
	fn wrap_members(
		&self,
		doc: &mut Document,
		tree: &mut DeclTree,
		members: &[DeclId],
		tag: DeclTag,
		report: &mut InsertionReport,
	) -> Result<()> {
		let mut groups: IndexMap<String, Vec<DeclId>> = IndexMap::new();
		for id in of_kind(tree, members, tag) {
			let decl = tree.node(id)?;
			if decl.is_multi_line(doc)? {
				groups.entry(decl.name.clone()).or_default().push(id);
			}
		}

		for (name, group) in groups {
			let overloaded = group.len() > 1;
			for &id in &group {
				let label = if overloaded && tag == DeclTag::Method {
					overload_label(doc, tree.node(id)?)?
				} else {
					name.clone()
				};
				let region = self.wrap(doc, tree, &[id], label, false)?;
				tree.node_mut(id)?.associated_region = Some(region);
				report.members += 1;
			}

			if overloaded {
				let label = self.config.labels.group_label(&name);
				self.wrap(doc, tree, &group, label, true)?;
				report.groups += 1;
			}
		}
		Ok(())
	}

	/// Writes one marker pair from the first to the last of `members`, which
	/// must be in document order, and records the new region node.
	fn wrap(
		&self,
		doc: &mut Document,
		tree: &mut DeclTree,
		members: &[DeclId],
		label: String,
		pseudo_group: bool,
	) -> Result<DeclId> {
		let (Some(&first), Some(&last)) = (members.first(), members.last()) else {
			return Err(LayoutError::Invariant(format!("region `{label}` has nothing to wrap")));
		};
		let at_start = tree.node(tree.outermost(first))?.start;
		let at_end = tree.node(tree.outermost(last))?.end;

		let start = self.markers.open(doc, &label, at_start)?;
		let end = self.markers.close(doc, at_end)?;
		let (first_line, last_line) = (doc.line_of(start)?, doc.line_of(end)?);
		trace!(label = %label, first_line, last_line, pseudo_group, "region written");

		let region = tree.push_generated(Decl::new(
			DeclKind::Region(RegionMarker {
				label,
				invalidated: false,
				pseudo_group,
			}),
			String::new(),
			start,
			end,
		))?;
		for &id in members {
			tree.set_envelope(id, region)?;
		}
		Ok(region)
	}
}

/// Renders `Name(first, second)` from the parameter text in the buffer.
fn overload_label(doc: &Document, decl: &Decl) -> Result<String> {
	let DeclKind::Method { parameters } = &decl.kind else {
		return Ok(decl.name.clone());
	};
	let texts = parameters
		.iter()
		.map(|parameter| parameter.text(doc))
		.collect::<Result<Vec<_>>>()?;
	Ok(format!("{}({})", decl.name, texts.join(", ")))
}

/// Materialized, non-region members sorted by start position.
fn in_document_order(doc: &Document, tree: &DeclTree, members: &[DeclId]) -> Result<Vec<DeclId>> {
	let mut ordered: Vec<(CharIdx, DeclId)> = Vec::with_capacity(members.len());
	for &id in members {
		let decl = tree.node(id)?;
		if decl.region().is_some() {
			continue;
		}
		if !decl.is_materialized(doc) {
			trace!(kind = %decl.tag(), name = %decl.name, "skipping declaration without text");
			continue;
		}
		ordered.push((doc.pos(decl.start)?, id));
	}
	ordered.sort();
	Ok(ordered.into_iter().map(|(_, id)| id).collect())
}

fn of_kind(tree: &DeclTree, members: &[DeclId], tag: DeclTag) -> Vec<DeclId> {
	members
		.iter()
		.copied()
		.filter(|&id| tree.get(id).is_some_and(|decl| decl.tag() == tag))
		.collect()
}
